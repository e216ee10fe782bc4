//! UI module root: exposes drawing functions for individual panels.

pub mod badges;
pub mod charts;
pub mod gpu;
pub mod header;
pub mod mem;
pub mod net;
pub mod theme;
pub mod util;
