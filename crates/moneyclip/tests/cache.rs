// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! End-to-end behavior of the unscoped client over the in-memory store.

#![cfg(feature = "memory")]

use std::{collections::HashMap, time::Duration};

use moneyclip::{InMemoryStore, MoneyClip, Overrides, Version};
use serde::{Deserialize, Serialize};
use tick::ClockControl;

fn block_on<F: std::future::Future>(f: F) -> F::Output {
    futures::executor::block_on(f)
}

fn client(control: &ClockControl) -> MoneyClip<InMemoryStore> {
    MoneyClip::builder(control.to_clock()).memory().build()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Profile {
    name: String,
    tags: Vec<String>,
}

#[test]
fn set_then_get_round_trips_structured_values() {
    block_on(async {
        let clip = client(&ClockControl::new());
        let profile = Profile {
            name: "ada".to_string(),
            tags: vec!["admin".to_string()],
        };

        assert!(clip.set("profile", &profile, &Overrides::new().version(3)).await.unwrap());
        assert_eq!(clip.get::<Profile>("profile", &Overrides::new().version(3)).await, Some(profile));
    });
}

#[test]
fn missing_key_is_a_miss() {
    block_on(async {
        let clip = client(&ClockControl::new());
        assert_eq!(clip.get::<String>("nothing", &Overrides::new()).await, None);
    });
}

#[test]
fn entries_expire_after_max_age() {
    block_on(async {
        let control = ClockControl::new();
        let clip = client(&control);
        let short = Overrides::new().max_age(Duration::from_millis(100));

        clip.set("thing", "value", &Overrides::new()).await.unwrap();
        assert_eq!(clip.get::<String>("thing", &Overrides::new()).await.as_deref(), Some("value"));

        control.advance(Duration::from_millis(200));

        assert_eq!(clip.get::<String>("thing", &short).await, None);
        assert!(clip.get_all::<String>(&short).await.is_empty());
    });
}

#[test]
fn entry_at_exact_max_age_is_still_valid() {
    block_on(async {
        let control = ClockControl::new();
        let clip = client(&control);
        let bounded = Overrides::new().max_age(Duration::from_millis(100));

        clip.set("k", &1, &bounded).await.unwrap();
        control.advance(Duration::from_millis(100));
        assert_eq!(clip.get::<i32>("k", &bounded).await, Some(1));

        control.advance(Duration::from_millis(1));
        assert_eq!(clip.get::<i32>("k", &bounded).await, None);
    });
}

#[test]
fn expired_entry_is_removed_from_the_store() {
    block_on(async {
        let control = ClockControl::new();
        let clip = client(&control);
        let bounded = Overrides::new().max_age(Duration::from_millis(10));

        clip.set("k", &1, &bounded).await.unwrap();
        control.advance(Duration::from_millis(11));
        assert_eq!(clip.get::<i32>("k", &bounded).await, None);

        // Even without an age bound the entry is gone.
        assert_eq!(clip.get::<i32>("k", &Overrides::new()).await, None);
    });
}

#[test]
fn version_mismatch_is_a_miss_and_evicts() {
    block_on(async {
        let clip = client(&ClockControl::new());

        clip.set("k", "v", &Overrides::new().version(1)).await.unwrap();
        assert_eq!(clip.get::<String>("k", &Overrides::new().version(2)).await, None);
        assert_eq!(clip.get::<String>("k", &Overrides::new().version(1)).await, None);
        assert!(clip.get_all::<String>(&Overrides::new().version(1)).await.is_empty());
    });
}

#[test]
fn numeric_and_text_versions_do_not_match() {
    block_on(async {
        let clip = client(&ClockControl::new());

        clip.set("k", "v", &Overrides::new().version(1)).await.unwrap();
        assert_eq!(clip.get::<String>("k", &Overrides::new().version("1")).await, None);
    });
}

#[test]
fn omitted_version_equals_explicit_sentinel() {
    block_on(async {
        let clip = client(&ClockControl::new());

        clip.set("implicit", "a", &Overrides::new()).await.unwrap();
        clip.set("explicit", "b", &Overrides::new().version(Version::default())).await.unwrap();

        assert_eq!(clip.get::<String>("implicit", &Overrides::new().version(0)).await.as_deref(), Some("a"));
        assert_eq!(clip.get::<String>("explicit", &Overrides::new()).await.as_deref(), Some("b"));
    });
}

#[test]
fn get_all_returns_exactly_the_valid_entries() {
    block_on(async {
        let control = ClockControl::new();
        let clip = client(&control);
        let options = Overrides::new().max_age(Duration::from_millis(100)).version("v2");

        clip.set("stale", &1, &options).await.unwrap();
        control.advance(Duration::from_millis(80));
        clip.set("fresh", &2, &options).await.unwrap();
        clip.set("old_schema", &3, &Overrides::new().version("v1")).await.unwrap();
        control.advance(Duration::from_millis(40));

        let all = clip.get_all::<i32>(&options).await;
        assert_eq!(all, HashMap::from([("fresh".to_string(), 2)]));

        assert_eq!(clip.scoped(&Overrides::new()).keys().await.unwrap(), vec!["fresh".to_string()]);
    });
}

#[test]
fn get_all_on_empty_partition_is_empty() {
    block_on(async {
        let clip = client(&ClockControl::new());
        assert!(clip.get_all::<String>(&Overrides::new().partition("void")).await.is_empty());
    });
}

#[test]
fn partitions_are_isolated() {
    block_on(async {
        let clip = client(&ClockControl::new());

        clip.set("k", "default", &Overrides::new()).await.unwrap();
        clip.set("k", "named", &Overrides::new().partition("named")).await.unwrap();

        assert_eq!(clip.get::<String>("k", &Overrides::new()).await.as_deref(), Some("default"));
        assert_eq!(
            clip.get::<String>("k", &Overrides::new().partition("named")).await.as_deref(),
            Some("named")
        );
        assert_eq!(clip.get_all::<String>(&Overrides::new().partition("named")).await.len(), 1);
    });
}

#[test]
fn unencodable_value_is_the_only_error() {
    block_on(async {
        let clip = client(&ClockControl::new());

        let mut map = HashMap::new();
        map.insert((1, 2), "tuple keys have no JSON form");

        clip.set("k", &map, &Overrides::new()).await.unwrap_err();
        assert_eq!(clip.get::<String>("k", &Overrides::new()).await, None);
    });
}

#[test]
fn defaults_apply_when_overrides_are_empty() {
    block_on(async {
        let control = ClockControl::new();
        let clip = MoneyClip::builder(control.to_clock())
            .memory()
            .max_age(Duration::from_millis(50))
            .version(9)
            .build();

        clip.set("k", "v", &Overrides::new()).await.unwrap();
        assert_eq!(clip.get::<String>("k", &Overrides::new().version(9)).await.as_deref(), Some("v"));

        control.advance(Duration::from_millis(51));
        assert_eq!(clip.get::<String>("k", &Overrides::new()).await, None);
    });
}

#[tokio::test]
async fn works_on_tokio_runtime() {
    let control = ClockControl::new();
    let clip = client(&control);

    clip.set("k", &vec![1, 2, 3], &Overrides::new()).await.unwrap();
    assert_eq!(clip.get::<Vec<i32>>("k", &Overrides::new()).await, Some(vec![1, 2, 3]));
}
