//! Windowing glue (behind the `winit` feature)
//!
//! The crate never owns a window. A host event loop forwards its
//! `WindowEvent`s through [`process_window_event`] into an [`Input`], then
//! drives the [`RenderGraph`](crate::composer::RenderGraph) with it.
//!
//! [`Input`]: crate::resources::input::Input

pub mod input_adapter;

pub use input_adapter::{process_window_event, translate_key, translate_mouse_button};
