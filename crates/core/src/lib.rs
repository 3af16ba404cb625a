//! Timeline layout for journey.
//!
//! ```text
//!   Timeline JSON ─▶ model::Activity[] ─▶ filter ─▶ layout::LayoutEngine ─▶ LayoutResult
//!                                                                              │
//!                                     RenderCommand[] ◀── views::timeline ◀────┘
//! ```
//!
//! Everything in this crate is pure: no clock, no I/O beyond
//! [`model::Timeline::load`], and no state carried between layout calls
//! other than the opt-in [`layout::LayoutCache`].

pub mod filter;
pub mod layout;
pub mod model;
pub mod views;
