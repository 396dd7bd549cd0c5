// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Caching a value with an age limit and a schema version.

use std::time::Duration;

use moneyclip::{MoneyClip, Overrides};
use serde::{Deserialize, Serialize};
use tick::Clock;

#[derive(Debug, Serialize, Deserialize)]
struct Forecast {
    city: String,
    celsius: f32,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), moneyclip::Error> {
    let clock = Clock::new_tokio();
    let clip = MoneyClip::builder(clock.clone())
        .memory()
        .max_age(Duration::from_millis(50))
        .version(1)
        .build();

    let forecast = Forecast {
        city: "Lisbon".to_string(),
        celsius: 21.5,
    };
    clip.set("lisbon", &forecast, &Overrides::new()).await?;

    let cached: Option<Forecast> = clip.get("lisbon", &Overrides::new()).await;
    println!("fresh read: {cached:?}");

    let next_schema: Option<Forecast> = clip.get("lisbon", &Overrides::new().version(2)).await;
    println!("read with version 2: {next_schema:?}");

    clip.set("lisbon", &forecast, &Overrides::new()).await?;
    clock.delay(Duration::from_millis(100)).await;
    let stale: Option<Forecast> = clip.get("lisbon", &Overrides::new()).await;
    println!("read after 100ms: {stale:?}");

    Ok(())
}
