//! Timetable connection finder.
//!
//! Answers: "which direct trips take me from this station to that one on a
//! given day, inside a given time window?" over a static schedule snapshot.

pub mod cache;
pub mod calendar;
pub mod cluster;
pub mod config;
pub mod domain;
pub mod query;
pub mod source;
pub mod web;
