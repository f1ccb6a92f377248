//! Basic usage examples for ResourcePool

use esox_resourcepool::{AcquireTimeout, ResourcePool};
use std::time::Duration;

#[derive(Debug)]
struct Connection {
    host: String,
}

fn main() {
    println!("=== EsoxSolutions.ResourcePool - Basic Examples ===\n");

    // Example 1: Scoped checkout
    scoped_checkout();

    // Example 2: Timeouts
    timeouts();

    // Example 3: LIFO reuse
    lifo_reuse();

    // Example 4: Stats
    stats();
}

fn connection_pool(size: usize) -> ResourcePool<Connection, &'static str> {
    let mut next = 0;
    ResourcePool::new(
        move || {
            next += 1;
            Connection {
                host: format!("db-{next}.internal"),
            }
        },
        size,
    )
    .unwrap()
}

fn scoped_checkout() {
    println!("1. Scoped Checkout:");
    let pool = connection_pool(3);

    {
        let conn = pool.acquire(AcquireTimeout::Unbounded, "report").unwrap();
        println!("   Got connection to {}", conn.host);
        // Connection automatically returned when dropped
    }

    let host = pool.scoped(Duration::from_secs(1), "closure", |conn| conn.host.clone());
    println!("   Closure used {:?}", host);
    println!("   Available after return: {}\n", pool.available_count());
}

fn timeouts() {
    println!("2. Timeouts:");
    let pool = connection_pool(1);

    let held = pool.try_acquire("holder");
    assert!(held.is_some());
    println!("   First acquire: Success");

    let second = pool.acquire(Duration::from_millis(100), "waiter");
    assert!(second.is_none());
    println!("   Second acquire: None after 100ms (pool exhausted)");

    drop(held);

    let third = pool.try_acquire("after release");
    assert!(third.is_some());
    println!("   Third acquire: Success\n");
}

fn lifo_reuse() {
    println!("3. LIFO Reuse:");
    let pool = connection_pool(3);

    for round in 0..3 {
        let conn = pool.try_acquire("serial").unwrap();
        println!("   Round {}: {} ({})", round, conn.host, conn.id());
    }

    println!();
}

fn stats() {
    println!("4. Stats:");
    let pool = connection_pool(3);

    let _a = pool.try_acquire("nightly export").unwrap();
    let _b = pool.try_acquire("user request").unwrap();

    let stats = pool.stats();
    for (id, idle) in &stats.available {
        println!("   {} available for {:?}", id, idle);
    }
    for (id, (held, job)) in &stats.checked_out {
        println!("   {} held by {:?} for {:?}", id, job, held);
    }

    let metrics = pool.export_metrics();
    println!("\n   Metrics:");
    for (key, value) in metrics {
        println!("     {}: {}", key, value);
    }
}
