//! Scan review flow
//!
//! Drives one receipt at a time through text recognition, extraction and
//! category suggestion, then either saves it straight away or holds the
//! draft for review.
//!
//! ```text
//! Idle --start--> Processing --ok--> Review --save--> (closed, Idle)
//!                     |                 \--retake--> Idle
//!                     \--err--> Error --retry--> Idle
//!                                    \--dismiss--> (closed, Idle)
//! ```
//!
//! Every attempt gets an [`AttemptToken`]. Results are only published for
//! the current token, and the automatic save is latched on the same
//! attempt record, so one attempt can never save twice or overwrite a
//! newer attempt's state.

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use super::draft::{ReceiptSubmission, ScanDraft};
use super::ledger::ExpenseLedger;
use super::source::{ReceiptImage, RecognitionError, RecognizedLines, TextSource};
use crate::error::{SpendscanError, SpendscanResult};
use crate::models::Expense;
use crate::parsing::{extract, suggest};

/// Where the flow currently stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanPhase {
    Idle,
    Processing(ReceiptImage),
    Review(ScanDraft),
    Error(String),
}

impl ScanPhase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Processing(_) => "processing",
            Self::Review(_) => "reviewing",
            Self::Error(_) => "showing an error",
        }
    }
}

/// Identifies one scan attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttemptToken(u64);

/// What publishing an attempt's result did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The draft waits in `Review` for the user
    NeedsReview,
    /// The draft was saved without review and the flow closed
    AutoSaved(Expense),
    /// Recognition failed; the flow shows this message
    Failed(String),
    /// The result belonged to an abandoned attempt and was dropped
    Discarded,
}

/// How the flow was closed by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowExit {
    Saved(Expense),
    Dismissed,
}

#[derive(Debug, Clone, Copy)]
struct Attempt {
    token: AttemptToken,
    auto_submitted: bool,
}

/// The scan review state machine
pub struct ScanFlow<L> {
    ledger: L,
    auto_save: bool,
    phase: ScanPhase,
    next_token: u64,
    attempt: Option<Attempt>,
}

impl<L: ExpenseLedger> ScanFlow<L> {
    pub fn new(ledger: L, auto_save: bool) -> Self {
        Self {
            ledger,
            auto_save,
            phase: ScanPhase::Idle,
            next_token: 0,
            attempt: None,
        }
    }

    pub fn phase(&self) -> &ScanPhase {
        &self.phase
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn auto_save(&self) -> bool {
        self.auto_save
    }

    /// The draft under review, if any
    pub fn draft(&self) -> Option<&ScanDraft> {
        match &self.phase {
            ScanPhase::Review(draft) => Some(draft),
            _ => None,
        }
    }

    /// Edit the draft under review
    pub fn draft_mut(&mut self) -> Option<&mut ScanDraft> {
        match &mut self.phase {
            ScanPhase::Review(draft) => Some(draft),
            _ => None,
        }
    }

    /// Whether the manual save action is enabled
    pub fn can_save(&self) -> bool {
        self.draft().is_some_and(ScanDraft::can_save)
    }

    /// Begin a new attempt for `image`
    ///
    /// Only allowed while idle; a second scan cannot start while another
    /// is in flight or waiting for review.
    pub fn start(&mut self, image: ReceiptImage) -> SpendscanResult<AttemptToken> {
        if self.phase != ScanPhase::Idle {
            return Err(self.rejected("start a scan"));
        }

        self.next_token += 1;
        let token = AttemptToken(self.next_token);
        self.attempt = Some(Attempt {
            token,
            auto_submitted: false,
        });

        info!(attempt = token.0, image = %image.path().display(), "scan started");
        self.phase = ScanPhase::Processing(image);
        Ok(token)
    }

    /// Publish the recognition result of an attempt
    ///
    /// Results for any attempt other than the one currently processing are
    /// discarded without touching the state.
    pub fn complete(
        &mut self,
        token: AttemptToken,
        recognized: Result<RecognizedLines, RecognitionError>,
    ) -> SpendscanResult<ScanOutcome> {
        let image = match (&self.phase, self.attempt) {
            (ScanPhase::Processing(image), Some(attempt)) if attempt.token == token => image.clone(),
            _ => {
                debug!(attempt = token.0, "discarding result of abandoned attempt");
                return Ok(ScanOutcome::Discarded);
            }
        };

        let lines = match recognized {
            Ok(lines) => lines,
            Err(err) => {
                warn!(attempt = token.0, error = %err, "receipt recognition failed");
                let message = format!("We couldn't read the receipt. {}", err);
                self.phase = ScanPhase::Error(message.clone());
                return Ok(ScanOutcome::Failed(message));
            }
        };

        let metadata = extract(lines.lines());
        let category = suggest(metadata.merchant.as_deref(), &self.ledger);
        let draft = ScanDraft::new(image, &metadata, category);
        debug!(
            attempt = token.0,
            merchant = ?metadata.merchant,
            total = ?metadata.total,
            %category,
            "receipt parsed"
        );

        self.phase = ScanPhase::Review(draft);
        self.try_auto_save(token)
    }

    /// Run a whole attempt: start, recognize, publish
    pub async fn scan<S>(&mut self, source: &S, image: ReceiptImage) -> SpendscanResult<ScanOutcome>
    where
        S: TextSource + ?Sized,
    {
        let token = self.start(image.clone())?;
        let recognized = source.recognize(&image).await;
        self.complete(token, recognized)
    }

    /// Save without review when the policy allows it, at most once per attempt
    fn try_auto_save(&mut self, token: AttemptToken) -> SpendscanResult<ScanOutcome> {
        if !self.auto_save {
            return Ok(ScanOutcome::NeedsReview);
        }

        let submission = match (&self.phase, self.attempt.as_mut()) {
            (ScanPhase::Review(draft), Some(attempt))
                if attempt.token == token && !attempt.auto_submitted =>
            {
                match ReceiptSubmission::automatic(draft, today()) {
                    Some(submission) => {
                        attempt.auto_submitted = true;
                        submission
                    }
                    None => return Ok(ScanOutcome::NeedsReview),
                }
            }
            _ => return Ok(ScanOutcome::NeedsReview),
        };

        info!(attempt = token.0, merchant = submission.merchant(), "auto-saving scan");
        // On failure the latch stays set and the draft remains under review
        let expense = self.ledger.save_submission(submission)?;
        self.close();
        Ok(ScanOutcome::AutoSaved(expense))
    }

    /// Throw away the current attempt and go back to idle
    pub fn retake(&mut self) -> SpendscanResult<()> {
        match self.phase {
            ScanPhase::Processing(_) | ScanPhase::Review(_) => {
                debug!("scan retaken");
                self.close();
                Ok(())
            }
            _ => Err(self.rejected("retake")),
        }
    }

    /// Leave the error screen for another try
    pub fn retry(&mut self) -> SpendscanResult<()> {
        match self.phase {
            ScanPhase::Error(_) => {
                self.close();
                Ok(())
            }
            _ => Err(self.rejected("retry")),
        }
    }

    /// Save a reviewed submission and close the flow
    pub fn save(&mut self, submission: ReceiptSubmission) -> SpendscanResult<FlowExit> {
        if !matches!(self.phase, ScanPhase::Review(_)) {
            return Err(self.rejected("save"));
        }

        let expense = self.ledger.save_submission(submission)?;
        info!(expense = %expense.id, "scan saved");
        self.close();
        Ok(FlowExit::Saved(expense))
    }

    /// Validate the draft under review and save it
    pub fn save_draft(&mut self) -> SpendscanResult<FlowExit> {
        let draft = self.draft().ok_or_else(|| self.rejected("save"))?;
        let submission = ReceiptSubmission::from_draft(draft, today())
            .map_err(|e| SpendscanError::Validation(e.to_string()))?;
        self.save(submission)
    }

    /// Close the flow from any phase
    pub fn dismiss(&mut self) -> FlowExit {
        debug!(phase = self.phase.name(), "scan flow dismissed");
        self.close();
        FlowExit::Dismissed
    }

    fn close(&mut self) {
        self.phase = ScanPhase::Idle;
        self.attempt = None;
    }

    fn rejected(&self, action: &'static str) -> SpendscanError {
        SpendscanError::InvalidTransition {
            action,
            phase: self.phase.name(),
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseCategory, MerchantMemory};
    use crate::parsing::CategoryLookup;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingLedger {
        memory: Mutex<MerchantMemory>,
        saved: Mutex<Vec<ReceiptSubmission>>,
        fail_saves: bool,
    }

    impl RecordingLedger {
        fn saved(&self) -> Vec<ReceiptSubmission> {
            self.saved.lock().unwrap().clone()
        }
    }

    impl CategoryLookup for RecordingLedger {
        fn lookup_category(&self, normalized_merchant: &str) -> Option<ExpenseCategory> {
            self.memory.lock().unwrap().get(normalized_merchant)
        }
    }

    impl ExpenseLedger for RecordingLedger {
        fn record_category(&self, merchant: &str, category: ExpenseCategory) -> SpendscanResult<bool> {
            Ok(self.memory.lock().unwrap().record(merchant, category))
        }

        fn save_submission(&self, submission: ReceiptSubmission) -> SpendscanResult<Expense> {
            if self.fail_saves {
                return Err(SpendscanError::Storage("disk full".into()));
            }
            let expense = Expense::new(
                submission.merchant(),
                submission.amount(),
                submission.category(),
                submission.date(),
            );
            self.record_category(submission.merchant(), submission.category())?;
            self.saved.lock().unwrap().push(submission);
            Ok(expense)
        }
    }

    struct FixedSource(Vec<&'static str>);

    #[async_trait]
    impl TextSource for FixedSource {
        async fn recognize(&self, _image: &ReceiptImage) -> Result<RecognizedLines, RecognitionError> {
            Ok(RecognizedLines::new(self.0.iter().map(|s| s.to_string()).collect()))
        }
    }

    struct BrokenSource;

    #[async_trait]
    impl TextSource for BrokenSource {
        async fn recognize(&self, image: &ReceiptImage) -> Result<RecognizedLines, RecognitionError> {
            Err(RecognitionError::ImageUnavailable(image.path().to_path_buf()))
        }
    }

    fn image() -> ReceiptImage {
        ReceiptImage::new("receipt.jpg")
    }

    fn lines(text: &[&str]) -> Result<RecognizedLines, RecognitionError> {
        Ok(RecognizedLines::new(text.iter().map(|s| s.to_string()).collect()))
    }

    #[tokio::test]
    async fn test_failing_source_lands_in_error() {
        let ledger = RecordingLedger::default();
        let mut flow = ScanFlow::new(&ledger, true);

        let outcome = flow.scan(&BrokenSource, image()).await.unwrap();

        assert!(matches!(outcome, ScanOutcome::Failed(_)));
        match flow.phase() {
            ScanPhase::Error(message) => {
                assert!(message.starts_with("We couldn't read the receipt."));
                assert!(message.contains("receipt.jpg"));
            }
            other => panic!("expected error phase, got {:?}", other),
        }
        assert!(ledger.saved().is_empty());

        flow.retry().unwrap();
        assert_eq!(flow.phase(), &ScanPhase::Idle);
    }

    #[tokio::test]
    async fn test_review_when_auto_save_disabled() {
        let ledger = RecordingLedger::default();
        let mut flow = ScanFlow::new(&ledger, false);
        let source = FixedSource(vec!["Starbucks Coffee", "Order #452", "Total: ₹245.50"]);

        let outcome = flow.scan(&source, image()).await.unwrap();

        assert_eq!(outcome, ScanOutcome::NeedsReview);
        let draft = flow.draft().unwrap();
        assert_eq!(draft.merchant, "Starbucks Coffee");
        assert_eq!(draft.total, Some(Decimal::from_str("245.50").unwrap()));
        assert_eq!(draft.category, ExpenseCategory::Food);
        assert!(draft.notes.is_empty());
        assert!(flow.can_save());
        assert!(ledger.saved().is_empty());
    }

    #[tokio::test]
    async fn test_auto_save_fires_once_and_closes() {
        let ledger = RecordingLedger::default();
        let mut flow = ScanFlow::new(&ledger, true);
        let source = FixedSource(vec!["Cafe Mocha", "12-10-2025", "Total 120"]);

        let outcome = flow.scan(&source, image()).await.unwrap();

        match outcome {
            ScanOutcome::AutoSaved(expense) => {
                assert_eq!(expense.title, "Cafe Mocha");
                assert_eq!(expense.amount, Decimal::from(120));
                assert_eq!(expense.date, NaiveDate::from_ymd_opt(2025, 10, 12).unwrap());
            }
            other => panic!("expected auto-save, got {:?}", other),
        }
        assert_eq!(flow.phase(), &ScanPhase::Idle);

        let saved = ledger.saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].notes(), "Cafe Mocha");
    }

    #[tokio::test]
    async fn test_auto_save_needs_a_total() {
        let ledger = RecordingLedger::default();
        let mut flow = ScanFlow::new(&ledger, true);
        let source = FixedSource(vec!["Cafe Mocha", "Thank you"]);

        let outcome = flow.scan(&source, image()).await.unwrap();

        assert_eq!(outcome, ScanOutcome::NeedsReview);
        assert!(flow.draft().is_some());
        assert!(!flow.can_save());
        assert!(ledger.saved().is_empty());
    }

    #[tokio::test]
    async fn test_zero_total_goes_to_review() {
        let ledger = RecordingLedger::default();
        let mut flow = ScanFlow::new(&ledger, true);
        let source = FixedSource(vec!["Cafe Mocha", "Total 0.00"]);

        let outcome = flow.scan(&source, image()).await.unwrap();

        assert_eq!(outcome, ScanOutcome::NeedsReview);
        assert_eq!(flow.draft().unwrap().total, Some(Decimal::ZERO));
        assert!(!flow.can_save());
        assert!(ledger.saved().is_empty());

        flow.draft_mut().unwrap().amount = "40".into();
        assert!(matches!(flow.save_draft().unwrap(), FlowExit::Saved(_)));
        assert_eq!(ledger.saved()[0].amount(), Decimal::from(40));
    }

    #[test]
    fn test_failed_auto_save_keeps_draft_for_review() {
        let ledger = RecordingLedger {
            fail_saves: true,
            ..Default::default()
        };
        let mut flow = ScanFlow::new(&ledger, true);

        let token = flow.start(image()).unwrap();
        let err = flow.complete(token, lines(&["Cafe", "Total 10"])).unwrap_err();

        assert!(matches!(err, SpendscanError::Storage(_)));
        assert!(flow.draft().is_some());

        // republishing the same attempt cannot auto-save again
        assert_eq!(
            flow.complete(token, lines(&["Cafe", "Total 10"])).unwrap(),
            ScanOutcome::Discarded
        );
        assert!(flow.try_auto_save(token).unwrap() == ScanOutcome::NeedsReview);
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let ledger = RecordingLedger::default();
        let mut flow = ScanFlow::new(&ledger, false);

        let first = flow.start(image()).unwrap();
        flow.retake().unwrap();
        let second = flow.start(ReceiptImage::new("second.jpg")).unwrap();
        assert_ne!(first, second);

        let outcome = flow.complete(first, lines(&["Old Shop", "Total 1"])).unwrap();
        assert_eq!(outcome, ScanOutcome::Discarded);
        assert_eq!(
            flow.phase(),
            &ScanPhase::Processing(ReceiptImage::new("second.jpg"))
        );

        let outcome = flow.complete(second, lines(&["New Shop", "Total 2"])).unwrap();
        assert_eq!(outcome, ScanOutcome::NeedsReview);
        assert_eq!(flow.draft().unwrap().merchant, "New Shop");
    }

    #[test]
    fn test_retake_discards_edits() {
        let ledger = RecordingLedger::default();
        let mut flow = ScanFlow::new(&ledger, false);

        let token = flow.start(image()).unwrap();
        flow.complete(token, lines(&["Uber Ride", "Total 300"])).unwrap();
        {
            let draft = flow.draft_mut().unwrap();
            draft.notes = "airport".into();
            draft.category = ExpenseCategory::Health;
        }

        flow.retake().unwrap();
        assert_eq!(flow.phase(), &ScanPhase::Idle);
        assert!(flow.draft().is_none());

        let token = flow.start(image()).unwrap();
        flow.complete(token, lines(&["Uber Ride", "Total 300"])).unwrap();
        let draft = flow.draft().unwrap();
        assert!(draft.notes.is_empty());
        assert_eq!(draft.category, ExpenseCategory::Transport);
    }

    #[test]
    fn test_start_rejected_while_busy() {
        let ledger = RecordingLedger::default();
        let mut flow = ScanFlow::new(&ledger, false);

        flow.start(image()).unwrap();
        let err = flow.start(image()).unwrap_err();
        assert!(err.is_invalid_transition());
        assert!(matches!(flow.phase(), ScanPhase::Processing(_)));
    }

    #[test]
    fn test_invalid_triggers_leave_state_alone() {
        let ledger = RecordingLedger::default();
        let mut flow = ScanFlow::new(&ledger, false);

        assert!(flow.retake().unwrap_err().is_invalid_transition());
        assert!(flow.retry().unwrap_err().is_invalid_transition());
        assert!(flow.save_draft().unwrap_err().is_invalid_transition());
        assert_eq!(flow.phase(), &ScanPhase::Idle);
    }

    #[test]
    fn test_manual_save_records_learned_category() {
        let ledger = RecordingLedger::default();
        let mut flow = ScanFlow::new(&ledger, false);

        let token = flow.start(image()).unwrap();
        flow.complete(token, lines(&["Uber Ride", "Total 300"])).unwrap();
        flow.draft_mut().unwrap().category = ExpenseCategory::Shopping;

        let exit = flow.save_draft().unwrap();
        assert!(matches!(exit, FlowExit::Saved(_)));
        assert_eq!(flow.phase(), &ScanPhase::Idle);

        // the correction sticks for the next receipt from the same merchant
        let token = flow.start(image()).unwrap();
        flow.complete(token, lines(&["Uber Ride", "Total 150"])).unwrap();
        assert_eq!(flow.draft().unwrap().category, ExpenseCategory::Shopping);
    }

    #[test]
    fn test_invalid_manual_save_keeps_review() {
        let ledger = RecordingLedger::default();
        let mut flow = ScanFlow::new(&ledger, false);

        let token = flow.start(image()).unwrap();
        flow.complete(token, lines(&["Cafe", "Total 10"])).unwrap();
        flow.draft_mut().unwrap().amount = "ten".into();

        assert!(!flow.can_save());
        let err = flow.save_draft().unwrap_err();
        assert!(err.is_validation());
        assert!(flow.draft().is_some());
        assert!(ledger.saved().is_empty());
    }

    #[test]
    fn test_dismiss_from_error_closes() {
        let ledger = RecordingLedger::default();
        let mut flow = ScanFlow::new(&ledger, true);

        let token = flow.start(image()).unwrap();
        flow.complete(
            token,
            Err(RecognitionError::ImageUnavailable("receipt.jpg".into())),
        )
        .unwrap();

        assert_eq!(flow.dismiss(), FlowExit::Dismissed);
        assert_eq!(flow.phase(), &ScanPhase::Idle);
        assert_eq!(
            flow.complete(token, lines(&["Cafe", "Total 1"])).unwrap(),
            ScanOutcome::Discarded
        );
    }
}
