//! Google Gemini backend over the `generateContent` REST endpoint.

mod client;
mod dto;

pub use client::{GeminiClient, classify_failure, extract_text};
