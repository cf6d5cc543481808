//! Core library: scanning, path resolution, tagging, classification, views.

pub mod classifier;
pub mod config;
pub mod models;
pub mod ocr;
pub mod patch;
pub mod pipeline;
pub mod resolver;
pub mod scanner;
pub mod tagger;
pub mod views;
