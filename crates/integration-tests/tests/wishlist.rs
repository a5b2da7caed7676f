//! Wishlist membership and toggle properties.

#![allow(clippy::unwrap_used)]

use quince_cart::store::MemoryLedger;
use quince_cart::{WishlistManager, WishlistToggle};
use quince_core::{ProductId, UserId};

#[tokio::test]
async fn get_or_create_returns_the_same_wishlist() {
    let ledger = MemoryLedger::new();
    let wishlists = WishlistManager::new(&ledger);
    let user = UserId::new(1);

    let first = wishlists.get_or_create(user).await.unwrap();
    let second = wishlists.get_or_create(user).await.unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(first.user_id, user);
}

#[tokio::test]
async fn contains_answers_false_with_no_wishlist() {
    let ledger = MemoryLedger::new();
    let wishlists = WishlistManager::new(&ledger);

    // The user has never touched a wishlist; this must not error.
    assert!(
        !wishlists
            .contains(UserId::new(2), ProductId::new(1))
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn add_is_idempotent_and_never_duplicates() {
    let ledger = MemoryLedger::new();
    let wishlists = WishlistManager::new(&ledger);
    let user = UserId::new(3);
    let product = ProductId::new(11);

    for _ in 0..3 {
        wishlists.add(user, product).await.unwrap();
    }

    let items = wishlists.items(user).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].product_id, product);
}

#[tokio::test]
async fn remove_succeeds_whether_or_not_present() {
    let ledger = MemoryLedger::new();
    let wishlists = WishlistManager::new(&ledger);
    let user = UserId::new(4);
    let product = ProductId::new(11);

    // Not present (and no wishlist at all): still success.
    wishlists.remove(user, product).await.unwrap();

    wishlists.add(user, product).await.unwrap();
    wishlists.remove(user, product).await.unwrap();
    wishlists.remove(user, product).await.unwrap();
    assert!(!wishlists.contains(user, product).await.unwrap());
}

#[tokio::test]
async fn toggle_flips_and_reports_each_state() {
    let ledger = MemoryLedger::new();
    let wishlists = WishlistManager::new(&ledger);
    let user = UserId::new(5);
    let product = ProductId::new(20);

    assert_eq!(
        wishlists.toggle(user, product).await.unwrap(),
        WishlistToggle::Added
    );
    assert!(wishlists.contains(user, product).await.unwrap());

    assert_eq!(
        wishlists.toggle(user, product).await.unwrap(),
        WishlistToggle::Removed
    );
    assert!(!wishlists.contains(user, product).await.unwrap());
}

#[tokio::test]
async fn toggle_on_a_fresh_user_creates_the_wishlist() {
    let ledger = MemoryLedger::new();
    let wishlists = WishlistManager::new(&ledger);
    let user = UserId::new(6);

    let state = wishlists.toggle(user, ProductId::new(1)).await.unwrap();
    assert!(state.added());
    assert_eq!(wishlists.items(user).await.unwrap().len(), 1);
}

#[tokio::test]
async fn products_are_independent_within_a_wishlist() {
    let ledger = MemoryLedger::new();
    let wishlists = WishlistManager::new(&ledger);
    let user = UserId::new(7);

    wishlists.add(user, ProductId::new(1)).await.unwrap();
    wishlists.add(user, ProductId::new(2)).await.unwrap();
    wishlists.remove(user, ProductId::new(1)).await.unwrap();

    assert!(!wishlists.contains(user, ProductId::new(1)).await.unwrap());
    assert!(wishlists.contains(user, ProductId::new(2)).await.unwrap());
}

#[tokio::test]
async fn wishlists_are_scoped_per_user() {
    let ledger = MemoryLedger::new();
    let wishlists = WishlistManager::new(&ledger);
    let product = ProductId::new(9);

    wishlists.add(UserId::new(8), product).await.unwrap();
    assert!(!wishlists.contains(UserId::new(9), product).await.unwrap());
}

#[tokio::test]
async fn clear_removes_everything_but_keeps_the_wishlist() {
    let ledger = MemoryLedger::new();
    let wishlists = WishlistManager::new(&ledger);
    let user = UserId::new(10);

    let wishlist = wishlists.get_or_create(user).await.unwrap();
    wishlists.add(user, ProductId::new(1)).await.unwrap();
    wishlists.add(user, ProductId::new(2)).await.unwrap();

    wishlists.clear(user).await.unwrap();
    assert!(wishlists.items(user).await.unwrap().is_empty());
    assert_eq!(wishlists.get_or_create(user).await.unwrap().id, wishlist.id);
}
