// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod collection;
pub mod forms;
pub mod gate;
pub mod ids;
pub mod matrix;
pub mod model;
pub mod selection;
pub mod state;

pub use collection::*;
pub use forms::*;
pub use gate::*;
pub use ids::*;
pub use matrix::*;
pub use model::*;
pub use selection::*;
pub use state::*;
