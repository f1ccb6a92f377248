//! Async usage examples

use esox_resourcepool::{AcquireTimeout, ResourcePool};
use std::time::Duration;
use tokio::time::sleep;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== EsoxSolutions.ResourcePool - Async Examples ===\n");

    // Example 1: Async acquire
    async_acquire().await;

    // Example 2: Async with timeout
    async_with_timeout().await;

    // Example 3: Concurrent access
    concurrent_access().await;
}

async fn async_acquire() {
    println!("1. Async Acquire:");
    let pool = ResourcePool::new(|| 42, 3).unwrap();

    {
        let conn = pool.acquire_async(AcquireTimeout::Unbounded, "task").await.unwrap();
        println!("   Got resource asynchronously: {}", *conn);
    }

    println!();
}

async fn async_with_timeout() {
    println!("2. Async with Timeout:");
    let pool = ResourcePool::new(|| 42, 1).unwrap();

    // Take the only resource
    let _held = pool.try_acquire("holder").unwrap();

    // Try to get another (should time out)
    match pool.acquire_async(Duration::from_millis(100), "waiter").await {
        Some(_) => println!("   Got resource"),
        None => println!("   No resource within 100ms"),
    }

    println!();
}

async fn concurrent_access() {
    println!("3. Concurrent Access:");
    let pool: ResourcePool<u32, usize> = ResourcePool::new(|| 0, 3).unwrap();

    let mut handles = vec![];

    for task in 0..10 {
        let pool = pool.clone();
        let handle = tokio::spawn(async move {
            if let Some(conn) = pool.acquire_async(Duration::from_millis(120), task).await {
                println!("   Task {} got {}", task, conn.id());
                sleep(Duration::from_millis(50)).await;
            } else {
                println!("   Task {} couldn't get a resource", task);
            }
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.await.unwrap();
    }

    println!("   Final available: {}", pool.available_count());
}
