//! Categorical encoding.
//!
//! - [`EventEncoder`] / [`EncoderState`]: event category label → bounded code
//!   (top-K by frequency, overflow bucket, "no event" sentinel)
//! - [`OutcomeEncoder`]: outcome label → sorted label index
//! - [`OneHotEncoder`]: event code → indicator columns, with the category set
//!   fixed at fit time
//!
//! # Code Space
//!
//! ```text
//! -1        no event (absent, blank or "No Event")
//! 0..K-1    K most frequent categories, by rank
//! K         overflow: everything else, including unseen labels
//! ```
//!
//! # Example
//!
//! ```
//! use event_forecaster::encoding::{EventEncoder, NO_EVENT_CODE};
//! use event_forecaster::records::EventRecord;
//! use chrono::NaiveDate;
//!
//! let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let events = vec![
//!     EventRecord::new(1, d, "Economic"),
//!     EventRecord::new(2, d, "Economic"),
//!     EventRecord::new(3, d, "War"),
//! ];
//!
//! let state = EventEncoder::new(1).fit(&events);
//! assert_eq!(state.encode(Some("Economic")), 0);
//! assert_eq!(state.encode(Some("War")), 1); // overflow
//! assert_eq!(state.encode(None), NO_EVENT_CODE);
//! ```

mod event;
mod one_hot;
mod outcome;

pub use event::{EncoderState, EventEncoder, DEFAULT_TOP_K, MAX_TOP_K, NO_EVENT_CODE};
pub use one_hot::OneHotEncoder;
pub use outcome::OutcomeEncoder;
