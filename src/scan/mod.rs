//! Receipt scanning
//!
//! Text recognition sources, the editable review draft, and the flow that
//! takes one receipt from image to saved expense.

pub mod draft;
pub mod flow;
pub mod ledger;
pub mod source;

pub use draft::{ReceiptSubmission, ScanDraft, SubmissionError};
pub use flow::{AttemptToken, FlowExit, ScanFlow, ScanOutcome, ScanPhase};
pub use ledger::ExpenseLedger;
pub use source::{
    CommandTextSource, ReceiptImage, RecognitionError, RecognizedLines, TextSource,
    TranscriptTextSource,
};
