//
//  sourcecraft-cli
//  tests/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sourcecraft_cli::api::{ClientConfig, Sleeper, SourceCraftClient};

pub const TOKEN: &str = "test-token";

/// Records requested delays and returns immediately.
#[derive(Default)]
pub struct RecordingSleeper {
    slept: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, delay: Duration) {
        self.slept.lock().unwrap().push(delay);
    }
}

/// A client pointed at `base_url` with a recording sleeper.
pub fn client_for(base_url: &str) -> (SourceCraftClient, Arc<RecordingSleeper>) {
    let sleeper = Arc::new(RecordingSleeper::default());
    let client = SourceCraftClient::new(ClientConfig::new(TOKEN).with_base_url(base_url))
        .unwrap()
        .with_sleeper(sleeper.clone());
    (client, sleeper)
}

pub fn secs(values: &[u64]) -> Vec<Duration> {
    values.iter().copied().map(Duration::from_secs).collect()
}
