// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Scoped caches per partition, with structured logs on stdout.

use std::time::Duration;

use moneyclip::{MoneyClip, Overrides, TelemetryConfig};
use tick::Clock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), moneyclip::Error> {
    tracing_subscriber::registry().with(fmt::layer()).init();

    let clip = MoneyClip::builder(Clock::new_tokio())
        .memory()
        .telemetry(TelemetryConfig::new().with_logs().build())
        .build();

    let avatars = clip.scoped(&Overrides::new().partition("avatars").max_age(Duration::from_secs(3600)));
    let sessions = clip.scoped(&Overrides::new().partition("sessions").version("2024-06"));

    avatars.set("ada", &[0x89_u8, 0x50, 0x4e, 0x47]).await?;
    sessions.set("ada", "token-1").await?;
    sessions.set("grace", "token-2").await?;

    let tokens = sessions.get_all::<String>().await;
    println!("sessions: {tokens:?}");
    println!("avatar keys: {:?}", avatars.keys().await?);

    sessions.clear().await?;
    println!("sessions after clear: {:?}", sessions.keys().await?);

    Ok(())
}
