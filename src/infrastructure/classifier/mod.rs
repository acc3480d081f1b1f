//! Classifier implementations

pub mod http_client;
pub mod keywords;
pub mod prompt;
pub mod remote;
pub mod rules;

pub use http_client::{HttpClient, HttpClientTrait, HttpError};
pub use remote::LlmClassifier;
pub use rules::RuleBasedClassifier;
