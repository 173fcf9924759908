pub mod error;

use dashmap::{mapref::entry::Entry, DashMap};
use model::{DateTime, Leaderboard, Question, Quiz, ScoreEntry, Status, Utc};

pub use model;

/// Number of hex digits in a generated quiz identifier.
const ID_LEN: usize = 8;

/// A quiz and its leaderboard. Both live and die together.
struct Record {
    quiz: Quiz,
    leaderboard: Leaderboard,
}

/// In-memory store of all quizzes for the lifetime of the process.
///
/// Every operation on a quiz runs while holding the write guard of that quiz's map entry. Hence,
/// two mutations of the same quiz never interleave whereas different quizzes proceed in parallel.
#[derive(Default)]
pub struct Database {
    quizzes: DashMap<Box<str>, Record>,
}

fn generate_id() -> Box<str> {
    let mut buf = uuid::Uuid::encode_buffer();
    let hex = uuid::Uuid::new_v4().simple().encode_lower(&mut buf);
    hex[..ID_LEN].into()
}

impl Database {
    fn read<T>(&self, id: &str, op: impl FnOnce(&Record) -> T) -> error::Result<T> {
        let record = self.quizzes.get(id).ok_or(error::Error::NotFound)?;
        Ok(op(record.value()))
    }

    fn write<T>(&self, id: &str, op: impl FnOnce(&mut Record) -> T) -> error::Result<T> {
        let mut record = self.quizzes.get_mut(id).ok_or(error::Error::NotFound)?;
        Ok(op(record.value_mut()))
    }

    /// Registers a new quiz with an empty leaderboard. Returns its freshly generated identifier.
    pub fn create_quiz(&self, title: String, questions: Vec<Question>, timer: i64) -> Box<str> {
        loop {
            let id = generate_id();
            if let Entry::Vacant(entry) = self.quizzes.entry(id.clone()) {
                let quiz = Quiz::new(id.clone(), title, questions, timer);
                entry.insert(Record { quiz, leaderboard: Leaderboard::default() });
                log::debug!("Created quiz {id}.");
                return id;
            }
            log::trace!("Quiz ID {id} is already taken. Drawing another.");
        }
    }

    pub fn get_quiz(&self, id: &str) -> error::Result<Quiz> {
        self.read(id, |record| record.quiz.clone())
    }

    pub fn get_status(&self, id: &str, now: DateTime<Utc>) -> error::Result<Status> {
        self.read(id, |record| record.quiz.status(now))
    }

    /// Appends a question to the quiz. Returns the new number of questions.
    pub fn add_question(&self, id: &str, question: Question) -> error::Result<usize> {
        self.write(id, |record| {
            record.quiz.questions.push(question);
            record.quiz.questions.len()
        })
    }

    /// Starts the quiz if it has not yet started. Returns the remaining seconds.
    pub fn start_quiz(&self, id: &str, now: DateTime<Utc>) -> error::Result<u64> {
        self.write(id, |record| {
            let fresh = !record.quiz.timer.is_started();
            let left = record.quiz.timer.start(now);
            if fresh {
                log::debug!("Started quiz {id} with {left} seconds left.");
            }
            left
        })
    }

    /// Shifts the quiz timer by `delta` seconds. Returns the remaining seconds.
    pub fn adjust_quiz(&self, id: &str, delta: i64, now: DateTime<Utc>) -> error::Result<u64> {
        self.write(id, |record| {
            let left = record.quiz.timer.adjust(delta, now);
            log::debug!("Adjusted quiz {id} by {delta} seconds to {left} seconds left.");
            left
        })
    }

    /// Records a submission. Returns the full leaderboard in ranked order.
    pub fn append_score(&self, id: &str, entry: ScoreEntry) -> error::Result<Vec<ScoreEntry>> {
        self.write(id, |record| {
            record.leaderboard.push(entry);
            record.leaderboard.as_slice().to_vec()
        })
    }

    pub fn get_leaderboard(&self, id: &str) -> error::Result<Vec<ScoreEntry>> {
        self.read(id, |record| record.leaderboard.as_slice().to_vec())
    }

    /// Number of quizzes created so far.
    pub fn len(&self) -> usize {
        self.quizzes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quizzes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{error::Error, Database, DateTime, Question, ScoreEntry, Utc, ID_LEN};
    use std::{collections::HashSet, sync::Arc};

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn question(text: &str) -> Question {
        Question {
            text: text.into(),
            options: vec![String::from("Yes"), String::from("No")],
            correct_index: 0,
        }
    }

    fn entry(name: &str, score: i64) -> ScoreEntry {
        ScoreEntry { name: name.into(), score }
    }

    #[test]
    fn creates_short_hex_identifiers() {
        let db = Database::default();
        let id = db.create_quiz(String::from("Trivia"), Vec::new(), 30);
        assert_eq!(id.len(), ID_LEN);
        assert!(id.bytes().all(|b| b.is_ascii_hexdigit()));

        let quiz = db.get_quiz(&id).unwrap();
        assert_eq!(quiz.id, id);
        assert_eq!(quiz.title, "Trivia");
        assert_eq!(quiz.timer.base(), 30);
        assert_eq!(quiz.timer.adjustment(), 0);
        assert!(quiz.timer.started_at().is_none());
        assert!(db.get_leaderboard(&id).unwrap().is_empty());
    }

    #[test]
    fn negative_timer_is_clamped_on_creation() {
        let db = Database::default();
        let id = db.create_quiz(String::from("Trivia"), Vec::new(), -10);
        assert_eq!(db.get_quiz(&id).unwrap().timer.base(), 0);
    }

    #[test]
    fn unknown_quiz_is_not_found() {
        let db = Database::default();
        db.create_quiz(String::from("Other"), Vec::new(), 10);

        let id = "deadbeef-not-an-id";
        assert_eq!(db.get_quiz(id).unwrap_err(), Error::NotFound);
        assert_eq!(db.get_status(id, at(0)).unwrap_err(), Error::NotFound);
        assert_eq!(db.add_question(id, question("?")).unwrap_err(), Error::NotFound);
        assert_eq!(db.start_quiz(id, at(0)).unwrap_err(), Error::NotFound);
        assert_eq!(db.adjust_quiz(id, 5, at(0)).unwrap_err(), Error::NotFound);
        assert_eq!(db.append_score(id, entry("A", 1)).unwrap_err(), Error::NotFound);
        assert_eq!(db.get_leaderboard(id).unwrap_err(), Error::NotFound);
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn questions_are_appended_in_order() {
        let db = Database::default();
        let id = db.create_quiz(String::from("Trivia"), vec![question("first")], 0);
        assert_eq!(db.add_question(&id, question("second")).unwrap(), 2);
        assert_eq!(db.add_question(&id, question("third")).unwrap(), 3);

        let texts: Vec<_> = db.get_quiz(&id).unwrap().questions.into_iter().map(|q| q.text).collect();
        assert_eq!(texts, ["first", "second", "third"]);
    }

    #[test]
    fn status_follows_the_countdown() {
        let db = Database::default();
        let id = db.create_quiz(String::from("Trivia"), Vec::new(), 60);

        let status = db.get_status(&id, at(0)).unwrap();
        assert!(!status.started);
        assert_eq!(status.time_left, 60);
        assert!(status.questions.is_empty());

        db.add_question(&id, question("Ready?")).unwrap();
        assert!(db.get_status(&id, at(0)).unwrap().questions.is_empty());

        assert_eq!(db.start_quiz(&id, at(0)).unwrap(), 60);

        let status = db.get_status(&id, at(10)).unwrap();
        assert!(status.started);
        assert_eq!(status.time_left, 50);
        assert_eq!(status.questions.len(), 1);
    }

    #[test]
    fn restarting_keeps_the_original_start() {
        let db = Database::default();
        let id = db.create_quiz(String::from("Trivia"), Vec::new(), 60);
        let first = db.start_quiz(&id, at(100)).unwrap();
        let second = db.start_quiz(&id, at(130)).unwrap();
        assert_eq!(first, 60);
        assert_eq!(second, 30);
        assert_eq!(db.get_quiz(&id).unwrap().timer.started_at(), Some(at(100)));
    }

    #[test]
    fn adjusting_before_start_clamps_duration() {
        let db = Database::default();
        let id = db.create_quiz(String::from("Trivia"), Vec::new(), 30);
        assert_eq!(db.adjust_quiz(&id, -50, at(0)).unwrap(), 0);
        let quiz = db.get_quiz(&id).unwrap();
        assert_eq!(quiz.timer.base(), 0);
        assert_eq!(quiz.timer.adjustment(), 0);
    }

    #[test]
    fn adjusting_after_start_extends_expired_quiz() {
        let db = Database::default();
        let id = db.create_quiz(String::from("Trivia"), Vec::new(), 20);
        db.start_quiz(&id, at(0)).unwrap();
        assert_eq!(db.get_status(&id, at(25)).unwrap().time_left, 0);
        assert_eq!(db.adjust_quiz(&id, 100, at(25)).unwrap(), 95);
        assert_eq!(db.get_quiz(&id).unwrap().timer.adjustment(), 100);
    }

    #[test]
    fn leaderboard_is_ranked() {
        let db = Database::default();
        let id = db.create_quiz(String::from("Trivia"), Vec::new(), 0);
        db.append_score(&id, entry("A", 50)).unwrap();
        db.append_score(&id, entry("B", 90)).unwrap();
        let board = db.append_score(&id, entry("C", 70)).unwrap();
        assert_eq!(board, [entry("B", 90), entry("C", 70), entry("A", 50)]);
        assert_eq!(db.get_leaderboard(&id).unwrap(), board);
    }

    #[test]
    fn leaderboards_are_independent() {
        let db = Database::default();
        let first = db.create_quiz(String::from("One"), Vec::new(), 0);
        let second = db.create_quiz(String::from("Two"), Vec::new(), 0);
        db.append_score(&first, entry("A", 1)).unwrap();
        assert_eq!(db.get_leaderboard(&first).unwrap().len(), 1);
        assert!(db.get_leaderboard(&second).unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creation_never_collides() {
        let db = Arc::new(Database::default());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let db = db.clone();
                tokio::spawn(async move {
                    (0..200).map(|_| db.create_quiz(String::from("Race"), Vec::new(), 0)).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            ids.extend(handle.await.unwrap());
        }
        assert_eq!(ids.len(), 3200);
        assert_eq!(db.len(), 3200);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_adjustments_are_not_lost() {
        let db = Arc::new(Database::default());
        let id = db.create_quiz(String::from("Race"), Vec::new(), 60);

        let mut handles: Vec<_> = (0..32)
            .map(|_| {
                let db = db.clone();
                let id = id.clone();
                tokio::spawn(async move {
                    for _ in 0..50 {
                        db.adjust_quiz(&id, 1, at(0)).unwrap();
                    }
                })
            })
            .collect();
        let starter = {
            let db = db.clone();
            let id = id.clone();
            tokio::spawn(async move {
                db.start_quiz(&id, at(0)).unwrap();
            })
        };
        handles.push(starter);
        for handle in handles {
            handle.await.unwrap();
        }

        // Each delta landed either in the duration or in the offset, never both nor neither.
        let timer = db.get_quiz(&id).unwrap().timer;
        assert!(timer.is_started());
        let total = i64::try_from(timer.base()).unwrap() + timer.adjustment();
        assert_eq!(total, 60 + 32 * 50);
        assert_eq!(timer.time_left(at(0)), 60 + 32 * 50);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_submissions_stay_ranked() {
        let db = Arc::new(Database::default());
        let id = db.create_quiz(String::from("Race"), Vec::new(), 0);

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let db = db.clone();
                let id = id.clone();
                tokio::spawn(async move {
                    for round in 0..25 {
                        let score = (worker * 37 + round * 11) % 100;
                        let board = db.append_score(&id, entry(&format!("{worker}-{round}"), score)).unwrap();
                        assert!(board.windows(2).all(|pair| pair[0].score >= pair[1].score));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let board = db.get_leaderboard(&id).unwrap();
        assert_eq!(board.len(), 200);
        assert!(board.windows(2).all(|pair| pair[0].score >= pair[1].score));
    }
}
