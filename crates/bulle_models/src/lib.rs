//! Generation backends for Bulle.
//!
//! Each provider lives behind its own feature flag and implements
//! [`BulleDriver`](bulle_interface::BulleDriver).
//!
//! # Available Providers
//!
//! - **Gemini** (Google) - Enable with `gemini` feature (default)
//!
//! # Example
//!
//! ```no_run
//! use bulle_core::{GeminiConfig, GenerateRequest};
//! use bulle_interface::BulleDriver;
//! use bulle_models::GeminiClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::from_config(&GeminiConfig::default())?;
//! let request = GenerateRequest::builder().prompt("Bonjour").build()?;
//! let response = client.generate(&request).await?;
//! println!("{}", response.text);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

#[cfg(feature = "gemini")]
mod gemini;

#[cfg(feature = "gemini")]
pub use gemini::{GeminiClient, classify_failure, extract_text};
