//
//  sourcecraft-cli
//  interactive/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Terminal prompts built on `dialoguer`. Every prompt is skipped under
//! `--no-prompt` or when stdin/stdout is not a terminal.

mod prompt;

pub use prompt::*;
