use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{
    FeedbackTier, HighScore, OptionSlot, QuestionBank, QuestionDraft, QuizSettings, SessionPhase,
};
use quiz_core::time::fixed_clock;
use services::session::RecordedSignal;
use services::{AppServices, ControllerStep, SessionController, SignalRecorder, TimerEvent};
use storage::repository::{
    HIGH_SCORE_KEY, HighScoreRecord, HighScoreRepository, InMemoryRepository, Storage,
    StorageError,
};
use tokio::sync::mpsc;

/// In-memory high score store that counts writes.
#[derive(Default)]
struct CountingRepository {
    inner: InMemoryRepository,
    writes: AtomicUsize,
}

#[async_trait]
impl HighScoreRepository for CountingRepository {
    async fn get_high_score(&self) -> Result<Option<HighScoreRecord>, StorageError> {
        self.inner.get_high_score().await
    }

    async fn save_high_score(
        &self,
        score: HighScore,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.save_high_score(score, updated_at).await
    }
}

fn bank(len: usize) -> QuestionBank {
    let drafts = (0..len).map(|i| {
        QuestionDraft::new(
            format!("Question {i}"),
            ["alpha", "bravo", "charlie", "delta"],
            i % 4,
        )
    });
    QuestionBank::from_drafts(drafts).0
}

fn correct_slot(controller: &SessionController) -> OptionSlot {
    let idx = controller
        .session()
        .presented()
        .iter()
        .position(|o| o.is_correct)
        .expect("one option is correct");
    OptionSlot::new(idx)
}

#[tokio::test(start_paused = true)]
async fn perfect_run_updates_high_score_once() {
    let repo = Arc::new(CountingRepository::default());
    repo.save_high_score(HighScore::new(2), fixed_clock().now())
        .await
        .unwrap();
    repo.writes.store(0, Ordering::SeqCst);

    let storage = Storage {
        high_scores: repo.clone(),
    };
    let services =
        AppServices::from_storage(&storage, fixed_clock(), bank(4), QuizSettings::default())
            .with_seed(Some(1));
    let recorder = Arc::new(SignalRecorder::new());
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut controller = services.session_controller(recorder.clone(), tx);

    controller.start().await.unwrap();
    let report = loop {
        controller.submit_answer(correct_slot(&controller)).unwrap();
        if let ControllerStep::Completed(report) = controller.request_advance().await.unwrap() {
            break report;
        }
    };

    assert_eq!(report.score, 4);
    assert_eq!(report.percentage, 100);
    assert_eq!(report.tier, FeedbackTier::Mastery);
    assert!(report.high_score_updated);
    assert_eq!(repo.writes.load(Ordering::SeqCst), 1);
    assert_eq!(
        repo.inner.get_raw(HIGH_SCORE_KEY).unwrap().as_deref(),
        Some("4")
    );
    assert!(matches!(
        recorder.signals().last(),
        Some(RecordedSignal::SessionCompleted(r)) if r.high_score == HighScore::new(4)
    ));
}

#[tokio::test(start_paused = true)]
async fn one_right_one_timed_out_is_fifty_percent() {
    let repo = Arc::new(CountingRepository::default());
    let storage = Storage {
        high_scores: repo.clone(),
    };
    let settings = QuizSettings::new(3, true).unwrap();
    let services =
        AppServices::from_storage(&storage, fixed_clock(), bank(2), settings).with_seed(Some(2));
    let recorder = Arc::new(SignalRecorder::new());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut controller = services.session_controller(recorder.clone(), tx);

    controller.start().await.unwrap();
    controller.submit_answer(correct_slot(&controller)).unwrap();
    controller.request_advance().await.unwrap();

    let report = loop {
        let signal = rx.recv().await.expect("timer keeps running");
        if let ControllerStep::Completed(report) = controller.handle_timer(signal).await.unwrap() {
            break report;
        }
    };

    assert_eq!(report.score, 1);
    assert_eq!(report.percentage, 50);
    assert_eq!(report.tier.as_str(), "okay");
    assert_eq!(controller.phase(), SessionPhase::Completed);
    // Beat the default of 0, so exactly one write.
    assert_eq!(repo.writes.load(Ordering::SeqCst), 1);

    // The timeout did not resolve an answer: only the first question did.
    let resolved = recorder
        .signals()
        .into_iter()
        .filter(|s| matches!(s, RecordedSignal::AnswerResolved(_)))
        .count();
    assert_eq!(resolved, 1);
}

#[tokio::test(start_paused = true)]
async fn timeout_racing_a_selection_loses() {
    let services = AppServices::detached(fixed_clock(), bank(3), QuizSettings::default())
        .with_seed(Some(3));
    let recorder = Arc::new(SignalRecorder::new());
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut controller = services.session_controller(recorder, tx);

    controller.start().await.unwrap();
    let presentation = controller.session().active_presentation().unwrap();
    controller.submit_answer(correct_slot(&controller)).unwrap();

    let step = controller
        .handle_timer(services::TimerSignal {
            presentation,
            event: TimerEvent::Expired,
        })
        .await
        .unwrap();

    assert_eq!(step, ControllerStep::Ignored);
    assert_eq!(controller.state().current_index(), 0);
    assert_eq!(controller.state().score(), 1);
}

#[tokio::test(start_paused = true)]
async fn restart_resets_progress_after_completion() {
    let services = AppServices::detached(fixed_clock(), bank(2), QuizSettings::default())
        .with_seed(Some(4));
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut controller = services.session_controller(Arc::new(SignalRecorder::new()), tx);

    controller.start().await.unwrap();
    for _ in 0..2 {
        controller.submit_answer(correct_slot(&controller)).unwrap();
        controller.request_advance().await.unwrap();
    }
    assert_eq!(controller.phase(), SessionPhase::Completed);
    assert_eq!(controller.state().score(), 2);

    controller.request_restart().await.unwrap();
    assert_eq!(controller.phase(), SessionPhase::Presenting);
    assert_eq!(controller.state().current_index(), 0);
    assert_eq!(controller.state().score(), 0);
}

#[tokio::test(start_paused = true)]
async fn restart_mid_question_discards_the_old_timer() {
    let settings = QuizSettings::new(3, true).unwrap();
    let services =
        AppServices::detached(fixed_clock(), bank(3), settings).with_seed(Some(5));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut controller = services.session_controller(Arc::new(SignalRecorder::new()), tx);

    controller.start().await.unwrap();
    controller.submit_answer(correct_slot(&controller)).unwrap();
    controller.request_advance().await.unwrap();
    let tick = rx.recv().await.unwrap();
    assert_eq!(
        controller.handle_timer(tick).await.unwrap(),
        ControllerStep::Ticked(2)
    );

    let step = controller.request_restart().await.unwrap();
    let ControllerStep::Presented(restarted) = step else {
        panic!("restart should present the first question, got {step:?}");
    };
    assert_eq!(controller.state().score(), 0);
    assert_eq!(controller.state().current_index(), 0);

    let mut steps = Vec::new();
    loop {
        let signal = rx.recv().await.expect("timer keeps running");
        let current = signal.presentation == restarted;
        let step = controller.handle_timer(signal).await.unwrap();
        if !current {
            assert_eq!(step, ControllerStep::Ignored);
            continue;
        }
        let next_question = matches!(step, ControllerStep::Presented(_));
        steps.push(step);
        if next_question {
            break;
        }
    }

    assert_eq!(
        steps[..3],
        [
            ControllerStep::Ticked(2),
            ControllerStep::Ticked(1),
            ControllerStep::Ticked(0),
        ]
    );
    assert!(matches!(steps[3], ControllerStep::Presented(id) if id != restarted));
    assert_eq!(controller.state().current_index(), 1);
    assert_eq!(controller.state().score(), 0);
}

#[tokio::test(start_paused = true)]
async fn empty_bank_reports_zero_percent() {
    let services = AppServices::detached(fixed_clock(), QuestionBank::default(), QuizSettings::default());
    let recorder = Arc::new(SignalRecorder::new());
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut controller = services.session_controller(recorder.clone(), tx);

    let step = controller.start().await.unwrap();
    let ControllerStep::Completed(report) = step else {
        panic!("empty bank should complete immediately, got {step:?}");
    };
    assert_eq!(report.percentage, 0);
    assert_eq!(report.total, 0);
    assert!(!controller.timer_running());
    assert_eq!(recorder.signals().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn broken_storage_keeps_the_quiz_playable() {
    struct Offline;

    #[async_trait]
    impl HighScoreRepository for Offline {
        async fn get_high_score(&self) -> Result<Option<HighScoreRecord>, StorageError> {
            Err(StorageError::Unavailable)
        }

        async fn save_high_score(
            &self,
            _score: HighScore,
            _updated_at: DateTime<Utc>,
        ) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    let storage = Storage {
        high_scores: Arc::new(Offline),
    };
    let services = AppServices::from_storage(&storage, fixed_clock(), bank(1), QuizSettings::default());
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut controller = services.session_controller(Arc::new(SignalRecorder::new()), tx);

    controller.start().await.unwrap();
    controller.submit_answer(correct_slot(&controller)).unwrap();
    let step = controller.request_advance().await.unwrap();
    let ControllerStep::Completed(report) = step else {
        panic!("expected completion, got {step:?}");
    };
    assert!(report.high_score_updated);
    assert_eq!(report.high_score, HighScore::new(1));
}

#[tokio::test]
async fn in_memory_repository_survives_between_sessions() {
    let repo = Arc::new(InMemoryRepository::new());
    let storage = Storage {
        high_scores: repo.clone(),
    };
    let services = AppServices::from_storage(&storage, fixed_clock(), bank(1), QuizSettings::default());
    assert_eq!(services.high_scores().load().await, HighScore::new(0));
    services.high_scores().record(HighScore::new(1)).await;

    let again = AppServices::from_storage(&storage, fixed_clock(), bank(1), QuizSettings::default());
    assert_eq!(again.high_scores().load().await, HighScore::new(1));
}
