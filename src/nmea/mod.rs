//! NMEA 0183 log line parsing: tokenization, sentence dispatch
//! and per sentence field extraction.
pub mod error;
pub mod extractor;
pub mod record;
pub mod sentence;
pub mod tokenizer;
