//! Minimal ratatui application runtime: a tick/render event loop driving an [`App`].

pub use self::{app::App, runtime::Runtime};

mod app;
mod event;
mod event_loop;
mod runtime;
