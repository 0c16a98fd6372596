// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client-side activity cache, its derived views and selection state.

pub mod selection;
pub mod snapshot;
pub mod store;
pub mod view;

pub use selection::{FormMode, Selection};
pub use snapshot::StoreSnapshot;
pub use store::{ActivityStore, CacheOptions};
pub use view::{group_by_date, project_by_date, ByDate};
