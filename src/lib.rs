#![forbid(unsafe_code)]
//! Relève — calcul de la chronologie d'astreinte sur une fenêtre de temps.
//!
//! - Rotation round-robin à période fixe, infinie dans les deux sens.
//! - Overrides ponctuels qui recouvrent la rotation (tri par début, le
//!   dernier appliqué l'emporte).
//! - Sortie triée, sans trou ni chevauchement, shifts contigus fusionnés.
//! - Tout en UTC ; parsing RFC3339 et JSON en dehors du cœur (`io`).

#[cfg(feature = "serde")]
pub mod io;
pub mod model;
pub mod render;
pub mod scheduler;
pub mod storage;
pub mod timeline;

pub use model::{Interval, Override, RotationSpec, Shift, UserId};
#[cfg(feature = "serde")]
pub use render::{CsvRenderer, JsonRenderer};
pub use render::{render_load, TextRenderer, TimelineRenderer};
pub use scheduler::{generate, resolve, SchedError, Scheduler, Slots};
pub use storage::OutputFile;
pub use timeline::{Timeline, UserLoad};
