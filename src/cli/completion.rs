//
//  sourcecraft-cli
//  cli/completion.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Shell completion scripts.
//!
//! ```bash
//! src completion bash > ~/.local/share/bash-completion/completions/src
//! src completion zsh > "${fpath[1]}/_src"
//! src completion fish > ~/.config/fish/completions/src.fish
//! ```

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};

use super::Cli;

/// Generate shell completion scripts
#[derive(Args, Debug)]
pub struct CompletionCommand {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionCommand {
    pub fn run(&self) -> Result<()> {
        let mut cmd = Cli::command();
        generate(self.shell, &mut cmd, crate::APP_NAME, &mut std::io::stdout());
        Ok(())
    }
}
