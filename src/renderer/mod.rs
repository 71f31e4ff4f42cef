//! Ticket rendering module
//!
//! Lays saved sets out as a lottery slip and rasterizes them through a
//! `Surface` (2D canvas in the browser).

pub mod surface;
pub mod ticket;

pub use surface::{DrawOp, RecordingSurface, Surface, TextAlign, TextBaseline, TicketImage};
pub use ticket::{TicketLayout, render_ticket, row_label, ticket_filename};
