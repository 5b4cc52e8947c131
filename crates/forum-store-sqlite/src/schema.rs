//! SQL schema for the forum store.
//!
//! Executed once when a [`Db`](crate::Db) is opened. Migrations are out of
//! scope; `PRAGMA user_version` records which layout a file was created with.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    email    TEXT    NOT NULL UNIQUE,   -- lowercase
    name     TEXT    NOT NULL,
    is_admin INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS topics (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT    NOT NULL UNIQUE,   -- lowercase
    title       TEXT    NOT NULL,
    description TEXT    NOT NULL
);

-- subject_id is the owning topic.
CREATE TABLE IF NOT EXISTS tags (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT    NOT NULL,           -- lowercase
    subject_id INTEGER NOT NULL REFERENCES topics(id),
    UNIQUE (name, subject_id),
    UNIQUE (id, subject_id)
);

CREATE TABLE IF NOT EXISTS threads (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    title           TEXT    NOT NULL,
    content         TEXT    NOT NULL,
    created_at      TEXT    NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    is_pinned       INTEGER NOT NULL DEFAULT 0,
    is_visible      INTEGER NOT NULL DEFAULT 1,
    topic_id        INTEGER NOT NULL REFERENCES topics(id),
    creator_user_id INTEGER NOT NULL REFERENCES users(id),
    UNIQUE (id, topic_id)
);

-- A thread's score is the number of rows here. One vote per user.
CREATE TABLE IF NOT EXISTS thread_votes (
    user_id   INTEGER NOT NULL REFERENCES users(id),
    thread_id INTEGER NOT NULL REFERENCES threads(id),
    PRIMARY KEY (user_id, thread_id)
);

-- subject_id pins both sides of the association to the same topic.
CREATE TABLE IF NOT EXISTS thread_tags (
    thread_id  INTEGER NOT NULL,
    tag_id     INTEGER NOT NULL,
    subject_id INTEGER NOT NULL,
    PRIMARY KEY (thread_id, tag_id),
    FOREIGN KEY (thread_id, subject_id) REFERENCES threads(id, topic_id),
    FOREIGN KEY (tag_id, subject_id)    REFERENCES tags(id, subject_id)
);

CREATE INDEX IF NOT EXISTS threads_topic_idx       ON threads(topic_id, is_pinned);
CREATE INDEX IF NOT EXISTS threads_creator_idx     ON threads(creator_user_id);
CREATE INDEX IF NOT EXISTS thread_votes_thread_idx ON thread_votes(thread_id);
CREATE INDEX IF NOT EXISTS thread_tags_tag_idx     ON thread_tags(tag_id);

PRAGMA user_version = 1;
";
