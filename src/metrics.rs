// Copyright (c) Wanderlust Team
// SPDX-License-Identifier: Apache-2.0

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use tracing::warn;

pub static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

static FOLLOWS_TOTAL: Lazy<Option<IntCounter>> = Lazy::new(|| {
    register(IntCounter::new("wanderlust_follows_total", "Follow edges created"))
});

static UNFOLLOWS_TOTAL: Lazy<Option<IntCounter>> = Lazy::new(|| {
    register(IntCounter::new("wanderlust_unfollows_total", "Follow edges removed"))
});

static FEED_REQUESTS_TOTAL: Lazy<Option<IntCounter>> = Lazy::new(|| {
    register(IntCounter::new(
        "wanderlust_feed_requests_total",
        "Feed assemblies served",
    ))
});

static ACTIVITIES_RECORDED_TOTAL: Lazy<Option<IntCounter>> = Lazy::new(|| {
    register(IntCounter::new(
        "wanderlust_activities_recorded_total",
        "Activity records written",
    ))
});

static ACTIVITIES_DROPPED_TOTAL: Lazy<Option<IntCounterVec>> = Lazy::new(|| {
    register(IntCounterVec::new(
        Opts::new(
            "wanderlust_activities_dropped_total",
            "Activity records skipped, by reason",
        ),
        &["reason"],
    ))
});

/// Build and register a collector; a failure leaves the metric disabled
fn register<C>(metric: prometheus::Result<C>) -> Option<C>
where
    C: prometheus::core::Collector + Clone + 'static,
{
    let metric = match metric {
        Ok(metric) => metric,
        Err(e) => {
            warn!("Invalid metric definition: {}", e);
            return None;
        }
    };
    if let Err(e) = REGISTRY.register(Box::new(metric.clone())) {
        warn!("Failed to register metric: {}", e);
    }
    Some(metric)
}

fn inc(counter: &Lazy<Option<IntCounter>>) {
    if let Some(counter) = counter.as_ref() {
        counter.inc();
    }
}

pub fn follow_created() {
    inc(&FOLLOWS_TOTAL);
}

pub fn follow_removed() {
    inc(&UNFOLLOWS_TOTAL);
}

pub fn feed_requested() {
    inc(&FEED_REQUESTS_TOTAL);
}

pub fn activity_recorded() {
    inc(&ACTIVITIES_RECORDED_TOTAL);
}

pub fn activity_dropped(reason: &str) {
    if let Some(dropped) = ACTIVITIES_DROPPED_TOTAL.as_ref() {
        dropped.with_label_values(&[reason]).inc();
    }
}

/// Render every registered metric in the Prometheus text format
pub fn render() -> Result<String, prometheus::Error> {
    // Touch the lazies so counters appear before their first increment
    Lazy::force(&FOLLOWS_TOTAL);
    Lazy::force(&UNFOLLOWS_TOTAL);
    Lazy::force(&FEED_REQUESTS_TOTAL);
    Lazy::force(&ACTIVITIES_RECORDED_TOTAL);
    Lazy::force(&ACTIVITIES_DROPPED_TOTAL);

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
