//! Bounded-concurrency mapping.
//!
//! A fixed pool of workers drains a shared index cursor, so at most
//! `concurrency` invocations of the worker are in flight at any instant
//! while `result[i]` always corresponds to `items[i]`. The mapper performs
//! no retry or failure handling of its own: workers are expected to catch
//! their own faults and return a placeholder, so one bad item can never
//! abort the batch.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::future::join_all;

pub async fn map_bounded<'a, T, R, F, Fut>(items: &'a [T], concurrency: usize, worker: F) -> Vec<R>
where
    F: Fn(&'a T) -> Fut,
    Fut: Future<Output = R>,
{
    if items.is_empty() {
        return Vec::new();
    }
    let workers = concurrency.clamp(1, items.len());

    let cursor = AtomicUsize::new(0);
    let worker = &worker;
    let cursor = &cursor;

    let pools = (0..workers).map(|_| async move {
        let mut claimed = Vec::new();
        loop {
            let index = cursor.fetch_add(1, Ordering::SeqCst);
            if index >= items.len() {
                break;
            }
            claimed.push((index, worker(&items[index]).await));
        }
        claimed
    });

    let mut indexed: Vec<(usize, R)> = join_all(pools).await.into_iter().flatten().collect();
    indexed.sort_by_key(|(index, _)| *index);
    indexed.into_iter().map(|(_, result)| result).collect()
}
