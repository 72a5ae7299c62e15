//
//  sourcecraft-cli
//  api/resources/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Resource callers.
//!
//! Each submodule adds methods to [`SourceCraftClient`](super::SourceCraftClient)
//! that build a path and optional body, delegate to the transport core and
//! decode the typed result. Lists return only their first [`Page`](super::Page).

pub mod cicd;
pub mod issues;
pub mod milestones;
pub mod pullrequests;
pub mod repositories;
pub mod roles;

pub use cicd::*;
pub use issues::*;
pub use milestones::*;
pub use pullrequests::*;
pub use repositories::*;
pub use roles::*;
