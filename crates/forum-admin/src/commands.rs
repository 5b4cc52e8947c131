//! Subcommands and their dispatch onto the store models.

use anyhow::Context as _;
use clap::Subcommand;
use forum_store_sqlite::{Db, TagModel, ThreadModel, TopicModel, UserModel};
use serde::Serialize;

#[derive(Subcommand)]
pub enum Command {
  /// Create the database file and schema, then exit.
  Init,
  Topic {
    #[command(subcommand)]
    action: TopicCmd,
  },
  Tag {
    #[command(subcommand)]
    action: TagCmd,
  },
  User {
    #[command(subcommand)]
    action: UserCmd,
  },
  Thread {
    #[command(subcommand)]
    action: ThreadCmd,
  },
}

#[derive(Subcommand)]
pub enum TopicCmd {
  Add { name: String, title: String, description: String },
  List,
}

#[derive(Subcommand)]
pub enum TagCmd {
  Add { topic: String, name: String },
  List { topic: String },
}

#[derive(Subcommand)]
pub enum UserCmd {
  Signup { email: String, name: String },
  Show { email: String },
}

#[derive(Subcommand)]
pub enum ThreadCmd {
  /// Create a thread and attach tags, all in one transaction.
  Add {
    topic:   String,
    creator: String,
    title:   String,
    content: String,
    /// Existing tag of the same topic; repeatable.
    #[arg(long = "tag")]
    tags:    Vec<String>,
  },
  Show { id: i64 },
  /// Threads of a topic, highest score first.
  List {
    topic: String,
    #[arg(long)]
    pinned: bool,
  },
  ByUser { email: String },
  ByTag { topic: String, tag: String },
  /// Ids of the threads a user has upvoted.
  Upvoted { email: String },
  Pin { id: i64 },
  Unpin { id: i64 },
  Hide { id: i64 },
  Unhide { id: i64 },
  Upvote { id: i64, email: String },
  Unvote { id: i64, email: String },
}

fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

pub fn run(db: &Db, command: Command) -> anyhow::Result<()> {
  let topics = TopicModel::new(db.clone());
  let tags = TagModel::new(db.clone());
  let threads = ThreadModel::new(db.clone());
  let users = UserModel::new(db.clone());

  match command {
    Command::Init => {
      tracing::info!("schema ready");
      Ok(())
    }

    Command::Topic { action } => match action {
      TopicCmd::Add { name, title, description } => {
        print(&topics.add_topic(None, &name, &title, &description)?)
      }
      TopicCmd::List => print(&topics.get_all_topics(None)?),
    },

    Command::Tag { action } => match action {
      TagCmd::Add { topic, name } => {
        let topic = topics.get_topic_by_name(None, &topic)?;
        print(&tags.add_tag(None, &name, &topic)?)
      }
      TagCmd::List { topic } => {
        let topic = topics.get_topic_by_name(None, &topic)?;
        print(&tags.get_tags_by_topic(None, &topic)?)
      }
    },

    Command::User { action } => match action {
      UserCmd::Signup { email, name } => print(&users.signup(None, &email, &name)?),
      UserCmd::Show { email } => print(&users.get_user_by_email(None, &email)?),
    },

    Command::Thread { action } => match action {
      ThreadCmd::Add { topic, creator, title, content, tags: tag_names } => {
        let tx = db.begin()?;
        let topic = topics.get_topic_by_name(Some(&tx), &topic)?;
        let creator = users
          .get_user_by_email(Some(&tx), &creator)
          .with_context(|| format!("no user {creator:?}"))?;
        let thread = threads.add_thread(Some(&tx), &title, &content, &topic, &creator)?;
        for name in &tag_names {
          let tag = tags
            .get_tag_by_name_and_topic(Some(&tx), name, &topic)
            .with_context(|| format!("no tag {name:?} in topic {:?}", topic.name))?;
          tags.add_thread_tag(Some(&tx), &thread, &tag)?;
        }
        tx.commit()?;
        tracing::info!(thread_id = thread.id, tags = tag_names.len(), "thread created");
        print(&thread)
      }
      ThreadCmd::Show { id } => print(&threads.get_thread_by_id(None, id)?),
      ThreadCmd::List { topic, pinned } => {
        let topic = topics.get_topic_by_name(None, &topic)?;
        print(&threads.get_threads_by_topic_and_is_pinned(None, &topic, pinned)?)
      }
      ThreadCmd::ByUser { email } => {
        let user = users.get_user_by_email(None, &email)?;
        print(&threads.get_threads_by_user(None, &user)?)
      }
      ThreadCmd::ByTag { topic, tag } => {
        let topic = topics.get_topic_by_name(None, &topic)?;
        let tag = tags.get_tag_by_name_and_topic(None, &tag, &topic)?;
        print(&threads.get_threads_by_tag(None, &tag)?)
      }
      ThreadCmd::Upvoted { email } => {
        let user = users.get_user_by_email(None, &email)?;
        let mut ids: Vec<i64> = threads
          .get_thread_ids_upvoted_by_user(None, &user)?
          .into_iter()
          .collect();
        ids.sort_unstable();
        print(&ids)
      }
      ThreadCmd::Pin { id } => {
        threads.pin_thread(None, &threads.get_thread_by_id(None, id)?)?;
        Ok(())
      }
      ThreadCmd::Unpin { id } => {
        threads.unpin_thread(None, &threads.get_thread_by_id(None, id)?)?;
        Ok(())
      }
      ThreadCmd::Hide { id } => {
        threads.hide_thread(None, &threads.get_thread_by_id(None, id)?)?;
        Ok(())
      }
      ThreadCmd::Unhide { id } => {
        threads.unhide_thread(None, &threads.get_thread_by_id(None, id)?)?;
        Ok(())
      }
      ThreadCmd::Upvote { id, email } => vote(&threads, &users, id, &email, true),
      ThreadCmd::Unvote { id, email } => vote(&threads, &users, id, &email, false),
    },
  }
}

fn vote(
  threads: &ThreadModel,
  users: &UserModel,
  id: i64,
  email: &str,
  up: bool,
) -> anyhow::Result<()> {
  let thread = threads.get_thread_by_id(None, id)?;
  let user = users.get_user_by_email(None, email)?;
  let changed = if up {
    threads.add_thread_vote_for_user(None, &thread, &user)?
  } else {
    threads.remove_thread_vote_for_user(None, &thread, &user)?
  };
  if !changed {
    tracing::info!(thread_id = id, user = %user.email, "vote unchanged");
  }
  print(&threads.get_thread_by_id(None, id)?)
}

#[cfg(test)]
mod tests {
  use super::*;

  struct Fixture {
    db:      Db,
    threads: ThreadModel,
    tags:    TagModel,
  }

  fn fixture() -> Fixture {
    let db = Db::open_in_memory().unwrap();
    let topic = TopicModel::new(db.clone()).add_topic(None, "rust", "Rust", "About Rust").unwrap();
    TagModel::new(db.clone()).add_tag(None, "help", &topic).unwrap();
    UserModel::new(db.clone()).signup(None, "a@b.com", "ada").unwrap();
    Fixture { threads: ThreadModel::new(db.clone()), tags: TagModel::new(db.clone()), db }
  }

  fn add_thread(tags: &[&str]) -> Command {
    Command::Thread {
      action: ThreadCmd::Add {
        topic:   "rust".into(),
        creator: "a@b.com".into(),
        title:   "Borrowing".into(),
        content: "How do lifetimes work?".into(),
        tags:    tags.iter().map(|t| t.to_string()).collect(),
      },
    }
  }

  fn threads_by_ada(f: &Fixture) -> usize {
    let user = UserModel::new(f.db.clone()).get_user_by_email(None, "a@b.com").unwrap();
    f.threads.get_threads_by_user(None, &user).unwrap().len()
  }

  #[test]
  fn thread_add_with_tags_commits_thread_and_tags() {
    let f = fixture();
    run(&f.db, add_thread(&["HELP"])).unwrap();

    let topic = TopicModel::new(f.db.clone()).get_topic_by_name(None, "rust").unwrap();
    let tag = f.tags.get_tag_by_name_and_topic(None, "help", &topic).unwrap();
    let tagged = f.threads.get_threads_by_tag(None, &tag).unwrap();
    assert_eq!(tagged.len(), 1);
    assert_eq!(tagged[0].title, "Borrowing");
    assert_eq!(threads_by_ada(&f), 1);
  }

  #[test]
  fn thread_add_with_unknown_tag_leaves_nothing_behind() {
    let f = fixture();
    let err = run(&f.db, add_thread(&["help", "missing"])).unwrap_err();
    assert!(err.to_string().contains("missing"), "{err:#}");
    assert_eq!(threads_by_ada(&f), 0);
  }

  #[test]
  fn thread_add_for_unknown_user_fails() {
    let f = fixture();
    let mut command = add_thread(&[]);
    if let Command::Thread { action: ThreadCmd::Add { creator, .. } } = &mut command {
      *creator = "nobody@b.com".into();
    }
    assert!(run(&f.db, command).is_err());
    assert_eq!(threads_by_ada(&f), 0);
  }
}
