//! Macro-generated test suite for `SockStore` contract validation.
//!
//! The `store_contract_tests!` macro generates a test module that validates
//! any `SockStore` implementation: id assignment, every finder, save, the
//! merge and withdraw operations, and their behavior under concurrent
//! writers.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use socks::storage::InMemorySockStore;
//!
//! store_contract_tests!(InMemorySockStore::new());
//! ```

/// Generate a full `SockStore` conformance test suite.
///
/// `$factory` must be an expression that evaluates to an empty store
/// implementing `SockStore + Clone + 'static`. It is re-evaluated for each
/// test to ensure isolation; the concurrency tests clone it into spawned
/// tasks.
#[macro_export]
macro_rules! store_contract_tests {
    ($factory:expr) => {
        mod store_contract_tests {
            use super::*;
            use socks::core::sock::{NewSock, Sock};
            use socks::core::store::{SockStore, StockMerge, Withdrawal};

            // ==================================================================
            // Insert & lookups
            // ==================================================================

            #[tokio::test]
            async fn test_insert_and_find_by_id() {
                let store = $factory;
                let created = store
                    .insert(NewSock::new(key("red", 80), 10))
                    .await
                    .unwrap();

                let found = store.find_by_id(created.id).await.unwrap();
                assert_eq!(found, Some(created));
            }

            #[tokio::test]
            async fn test_find_by_id_missing() {
                let store = $factory;
                assert_eq!(store.find_by_id(12345).await.unwrap(), None);
            }

            #[tokio::test]
            async fn test_find_all_in_id_order() {
                let store = $factory;
                assert!(store.find_all().await.unwrap().is_empty());

                let seeded = seed(&store, &[("red", 80, 1), ("blue", 60, 2), ("green", 10, 3)]).await;
                let all = store.find_all().await.unwrap();

                assert_eq!(all, seeded);
                assert!(all.windows(2).all(|w| w[0].id < w[1].id));
            }

            #[tokio::test]
            async fn test_find_by_color_is_case_sensitive() {
                let store = $factory;
                seed(&store, &[("Red", 80, 1), ("red", 80, 2), ("red", 30, 3)]).await;

                let reds = store.find_by_color("red").await.unwrap();
                assert_eq!(percentages(&reds), vec![80, 30]);

                let capital = store.find_by_color("Red").await.unwrap();
                assert_eq!(capital.len(), 1);
                assert_eq!(capital[0].quantity, 1);
            }

            #[tokio::test]
            async fn test_color_scoped_comparisons() {
                let store = $factory;
                seed(
                    &store,
                    &[("red", 40, 1), ("red", 50, 1), ("red", 60, 1), ("blue", 70, 1)],
                )
                .await;

                let equal = store
                    .find_by_color_and_cotton_percentage("red", 50)
                    .await
                    .unwrap();
                assert_eq!(percentages(&equal), vec![50]);

                let greater = store
                    .find_by_color_and_cotton_percentage_greater_than("red", 50)
                    .await
                    .unwrap();
                assert_eq!(percentages(&greater), vec![60]);

                let less = store
                    .find_by_color_and_cotton_percentage_less_than("red", 50)
                    .await
                    .unwrap();
                assert_eq!(percentages(&less), vec![40]);
            }

            #[tokio::test]
            async fn test_unscoped_comparisons() {
                let store = $factory;
                seed(&store, &[("red", 40, 1), ("blue", 50, 1), ("green", 60, 1)]).await;

                let equal = store.find_by_cotton_percentage(50).await.unwrap();
                assert_eq!(colors(&equal), vec!["blue"]);

                let greater = store.find_by_cotton_percentage_greater_than(40).await.unwrap();
                assert_eq!(colors(&greater), vec!["blue", "green"]);

                let less = store.find_by_cotton_percentage_less_than(60).await.unwrap();
                assert_eq!(colors(&less), vec!["red", "blue"]);
            }

            #[tokio::test]
            async fn test_between_is_inclusive() {
                let store = $factory;
                seed(&store, &[("a", 50, 1), ("b", 78, 1), ("c", 96, 1)]).await;

                let hits = store.find_by_cotton_percentage_between(50, 80).await.unwrap();
                assert_eq!(percentages(&hits), vec![50, 78]);

                let reversed = store.find_by_cotton_percentage_between(80, 50).await.unwrap();
                assert!(reversed.is_empty());
            }

            // ==================================================================
            // Save
            // ==================================================================

            #[tokio::test]
            async fn test_save_overwrites_by_id() {
                let store = $factory;
                let seeded = seed(&store, &[("red", 80, 10)]).await;

                let replacement = Sock {
                    id: seeded[0].id,
                    color: "black".to_string(),
                    cotton_percentage: 20,
                    quantity: 3,
                };
                let saved = store.save(replacement.clone()).await.unwrap();

                assert_eq!(saved, replacement);
                assert_eq!(store.find_all().await.unwrap(), vec![replacement]);
            }

            #[tokio::test]
            async fn test_save_unknown_id_fails() {
                let store = $factory;
                let ghost = NewSock::new(key("red", 80), 1).with_id(999);
                assert!(store.save(ghost).await.is_err());
                assert!(store.find_all().await.unwrap().is_empty());
            }

            // ==================================================================
            // Merge
            // ==================================================================

            #[tokio::test]
            async fn test_merge_creates_then_increments() {
                let store = $factory;

                let created = store.merge_stock(&key("blue", 60), 20).await.unwrap();
                assert!(created.is_created());
                assert_eq!(created.sock().quantity, 20);

                let merged = store.merge_stock(&key("blue", 60), 10).await.unwrap();
                assert_eq!(
                    merged,
                    StockMerge::Merged {
                        sock: Sock {
                            quantity: 30,
                            ..created.sock().clone()
                        },
                        duplicates: 0,
                    }
                );
                assert_eq!(store.find_all().await.unwrap().len(), 1);
            }

            #[tokio::test]
            async fn test_merge_targets_lowest_id_duplicate() {
                let store = $factory;
                let seeded = seed(&store, &[("red", 80, 1), ("red", 80, 2)]).await;

                let outcome = store.merge_stock(&key("red", 80), 5).await.unwrap();

                assert_eq!(
                    outcome,
                    StockMerge::Merged {
                        sock: Sock {
                            quantity: 6,
                            ..seeded[0].clone()
                        },
                        duplicates: 1,
                    }
                );
                assert_eq!(store.find_by_id(seeded[1].id).await.unwrap(), Some(seeded[1].clone()));
            }

            #[tokio::test]
            async fn test_merge_batch_applies_rows_in_order() {
                let store = $factory;
                seed(&store, &[("blue", 60, 5)]).await;

                let outcomes = store
                    .merge_stock_batch(vec![
                        (key("red", 80), 3),
                        (key("blue", 60), 1),
                        (key("red", 80), 4),
                    ])
                    .await
                    .unwrap();

                assert_eq!(outcomes.len(), 3);
                assert!(outcomes[0].is_created());
                assert_eq!(outcomes[1].sock().quantity, 6);
                assert!(!outcomes[2].is_created());
                assert_eq!(outcomes[2].sock().quantity, 7);
                assert_eq!(store.find_all().await.unwrap().len(), 2);
            }

            #[tokio::test]
            async fn test_failed_merge_batch_rolls_back() {
                let store = $factory;
                let seeded = seed(&store, &[("blue", 60, 5), ("red", 80, i32::MAX)]).await;

                let result = store
                    .merge_stock_batch(vec![
                        (key("blue", 60), 10),
                        (key("green", 20), 1),
                        (key("red", 80), 1),
                    ])
                    .await;

                assert!(result.is_err());
                assert_eq!(store.find_all().await.unwrap(), seeded);
            }

            // ==================================================================
            // Withdraw
            // ==================================================================

            #[tokio::test]
            async fn test_withdraw_unknown_sku() {
                let store = $factory;
                seed(&store, &[("Red", 80, 10)]).await;

                let outcome = store.withdraw_stock(&key("red", 80), 1).await.unwrap();
                assert_eq!(outcome, Withdrawal::UnknownSku);
            }

            #[tokio::test]
            async fn test_withdraw_insufficient_leaves_stock() {
                let store = $factory;
                let seeded = seed(&store, &[("Red", 80, 10)]).await;

                let outcome = store.withdraw_stock(&key("Red", 80), 15).await.unwrap();

                assert_eq!(outcome, Withdrawal::Insufficient { available: 10 });
                assert_eq!(store.find_by_id(seeded[0].id).await.unwrap(), Some(seeded[0].clone()));
            }

            #[tokio::test]
            async fn test_withdraw_down_to_zero() {
                let store = $factory;
                seed(&store, &[("Red", 80, 10)]).await;

                let first = store.withdraw_stock(&key("Red", 80), 4).await.unwrap();
                let second = store.withdraw_stock(&key("Red", 80), 6).await.unwrap();

                assert!(matches!(first, Withdrawal::Applied(ref s) if s.quantity == 6));
                assert!(matches!(second, Withdrawal::Applied(ref s) if s.quantity == 0));
                assert_eq!(
                    store.withdraw_stock(&key("Red", 80), 1).await.unwrap(),
                    Withdrawal::Insufficient { available: 0 }
                );
            }

            // ==================================================================
            // Concurrency
            // ==================================================================

            #[tokio::test]
            async fn test_concurrent_withdrawals_never_oversell() {
                let store = $factory;
                seed(&store, &[("grey", 50, 20)]).await;

                let handles: Vec<_> = (0..15)
                    .map(|_| {
                        let store = store.clone();
                        tokio::spawn(async move { store.withdraw_stock(&key("grey", 50), 2).await })
                    })
                    .collect();

                let mut applied = 0;
                for handle in handles {
                    if let Withdrawal::Applied(_) = handle.await.unwrap().unwrap() {
                        applied += 1;
                    }
                }

                assert_eq!(applied, 10);
                let remaining = store.find_by_color("grey").await.unwrap();
                assert_eq!(remaining[0].quantity, 0);
            }

            #[tokio::test]
            async fn test_concurrent_first_adds_create_one_record() {
                let store = $factory;

                let handles: Vec<_> = (0..10)
                    .map(|_| {
                        let store = store.clone();
                        tokio::spawn(async move { store.merge_stock(&key("navy", 70), 3).await })
                    })
                    .collect();

                let mut created = 0;
                for handle in handles {
                    if handle.await.unwrap().unwrap().is_created() {
                        created += 1;
                    }
                }

                assert_eq!(created, 1);
                let navy = store.find_by_color("navy").await.unwrap();
                assert_eq!(navy.len(), 1);
                assert_eq!(navy[0].quantity, 30);
            }

            #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
            async fn test_concurrent_batches_in_opposite_order_both_apply() {
                let store = $factory;
                let forward: Vec<_> = (0..20).map(|i| (key(&format!("c{}", i), i), 1)).collect();
                let backward: Vec<_> = forward.iter().rev().cloned().collect();

                for _ in 0..5 {
                    let a = {
                        let store = store.clone();
                        let rows = forward.clone();
                        tokio::spawn(async move { store.merge_stock_batch(rows).await })
                    };
                    let b = {
                        let store = store.clone();
                        let rows = backward.clone();
                        tokio::spawn(async move { store.merge_stock_batch(rows).await })
                    };
                    a.await.unwrap().unwrap();
                    b.await.unwrap().unwrap();
                }

                let all = store.find_all().await.unwrap();
                assert_eq!(all.len(), 20);
                assert!(all.iter().all(|s| s.quantity == 10));
            }
        }
    };
}
