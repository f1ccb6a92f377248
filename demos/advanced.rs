//! Advanced usage: configuration, tags, health and Prometheus export

use esox_resourcepool::{Label, LabelSet, PoolConfiguration, PoolError, ResourcePool};
use std::thread;
use std::time::Duration;

#[derive(Debug)]
struct Session {
    id: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== EsoxSolutions.ResourcePool - Advanced Examples ===\n");

    // Example 1: Factory failure
    factory_failure();

    // Example 2: Worker threads with configuration and tags
    workers()?;

    Ok(())
}

fn factory_failure() {
    println!("1. Factory Failure:");
    let mut attempts = 0;

    let result = ResourcePool::<Session>::try_new(
        || {
            attempts += 1;
            if attempts > 2 {
                Err(std::io::Error::other("connection refused"))
            } else {
                Ok(Session { id: attempts })
            }
        },
        4,
    );

    match result {
        Err(PoolError::Factory { index, source }) => {
            println!("   Resource #{} failed: {}\n", index, source);
        }
        Err(e) => println!("   Error: {}\n", e),
        Ok(_) => println!("   Unexpectedly built the pool\n"),
    }
}

fn workers() -> Result<(), Box<dyn std::error::Error>> {
    println!("2. Worker Threads:");

    let job_kinds = LabelSet::new([
        Label::from("import"),
        Label::from("export"),
        Label::from(("re-index", "reindex")),
    ])?;
    let tags = LabelSet::new([("service", "api"), ("tier", "primary")])?;

    let config = PoolConfiguration::new()
        .with_size(2)
        .with_name("sessions")
        .with_default_timeout(Duration::from_millis(200))
        .with_long_checkout_threshold(Duration::from_millis(50))
        .with_tags(tags);

    let mut next = 0;
    let pool: ResourcePool<Session, String> = ResourcePool::with_configuration(
        || {
            next += 1;
            Ok::<_, std::io::Error>(Session { id: next })
        },
        config,
    )?;

    let handles: Vec<_> = job_kinds
        .values()
        .into_iter()
        .map(|kind| {
            let pool = pool.clone();
            let kind = kind.to_string();
            thread::spawn(move || match pool.acquire_default(kind.clone()) {
                Some(session) => {
                    println!("   {} running on session {}", kind, session.id);
                    thread::sleep(Duration::from_millis(100));
                }
                None => println!("   {} skipped: no session available", kind),
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(75));
    let health = pool.health_status();
    println!("   Healthy: {}", health.is_healthy());
    for warning in &health.warnings {
        println!("   Warning: {}", warning);
    }

    for handle in handles {
        handle.join().expect("worker panicked");
    }

    println!("\n   Prometheus:");
    for line in pool.export_metrics_prometheus()?.lines() {
        println!("     {}", line);
    }

    Ok(())
}
