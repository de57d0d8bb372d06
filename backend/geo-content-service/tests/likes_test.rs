mod common;

use common::{content_body, fixture};
use geo_content_service::entity::{Event, Post, Resource, ResourceKind, Thread};
use geo_content_service::models::LikeToggle;
use geo_content_service::AppError;

#[tokio::test]
async fn test_like_then_unlike_round_trips() {
    let fx = fixture();
    let post: Post = fx
        .engine
        .create(&content_body("community", 35.68, 139.76, "likeable"), fx.user)
        .await
        .unwrap();

    let liked = fx
        .likes
        .toggle(fx.user, ResourceKind::Post, post.id())
        .await
        .unwrap();
    assert_eq!(liked, LikeToggle { liked: true, like_count: 1 });
    assert_eq!(fx.store.like_rows(ResourceKind::Post, post.id()).await, 1);

    let unliked = fx
        .likes
        .toggle(fx.user, ResourceKind::Post, post.id())
        .await
        .unwrap();
    assert_eq!(unliked, LikeToggle { liked: false, like_count: 0 });
    assert_eq!(fx.store.like_rows(ResourceKind::Post, post.id()).await, 0);

    let stored: Post = fx.engine.get(post.id()).await.unwrap();
    assert_eq!(stored.like_count, 0);
}

#[tokio::test]
async fn test_counts_follow_distinct_users() {
    let fx = fixture();
    let kai = fx.add_user("kai").await;
    let thread: Thread = fx
        .engine
        .create(&content_body("disaster", 0.0, 0.0, "alert"), fx.user)
        .await
        .unwrap();

    fx.likes
        .toggle(fx.user, ResourceKind::Thread, thread.id())
        .await
        .unwrap();
    let second = fx
        .likes
        .toggle(kai, ResourceKind::Thread, thread.id())
        .await
        .unwrap();
    assert_eq!(second.like_count, 2);

    let status = fx
        .likes
        .status(fx.user, ResourceKind::Thread, thread.id())
        .await
        .unwrap();
    assert_eq!(status, LikeToggle { liked: true, like_count: 2 });

    let after = fx
        .likes
        .toggle(kai, ResourceKind::Thread, thread.id())
        .await
        .unwrap();
    assert_eq!(after, LikeToggle { liked: false, like_count: 1 });

    let kai_status = fx
        .likes
        .status(kai, ResourceKind::Thread, thread.id())
        .await
        .unwrap();
    assert!(!kai_status.liked);
}

#[tokio::test]
async fn test_likes_are_scoped_per_kind() {
    let fx = fixture();
    let post: Post = fx
        .engine
        .create(&content_body("community", 0.0, 0.0, "p"), fx.user)
        .await
        .unwrap();
    let event: Event = fx
        .engine
        .create(&content_body("community", 0.0, 0.0, "e"), fx.user)
        .await
        .unwrap();
    assert_eq!(post.id(), event.id());

    fx.likes
        .toggle(fx.user, ResourceKind::Post, post.id())
        .await
        .unwrap();

    let event_status = fx
        .likes
        .status(fx.user, ResourceKind::Event, event.id())
        .await
        .unwrap();
    assert_eq!(event_status, LikeToggle { liked: false, like_count: 0 });
}

#[tokio::test]
async fn test_toggling_missing_or_deleted_resource_is_not_found() {
    let fx = fixture();
    assert!(matches!(
        fx.likes.toggle(fx.user, ResourceKind::Event, 99).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        fx.likes.status(fx.user, ResourceKind::Event, 99).await,
        Err(AppError::NotFound(_))
    ));

    let event: Event = fx
        .engine
        .create(&content_body("entertainment", 0.0, 0.0, "gone"), fx.user)
        .await
        .unwrap();
    fx.engine.delete::<Event>(event.id()).await.unwrap();

    assert!(matches!(
        fx.likes.toggle(fx.user, ResourceKind::Event, event.id()).await,
        Err(AppError::NotFound(_))
    ));
    assert_eq!(fx.store.like_rows(ResourceKind::Event, event.id()).await, 0);
}

#[tokio::test]
async fn test_failed_counter_update_rolls_back_the_like() {
    let fx = fixture();
    let post: Post = fx
        .engine
        .create(&content_body("community", 0.0, 0.0, "fragile"), fx.user)
        .await
        .unwrap();

    fx.store.fail_next_counter_write();
    let result = fx.likes.toggle(fx.user, ResourceKind::Post, post.id()).await;
    assert!(matches!(result, Err(AppError::Storage(_))));

    assert_eq!(fx.store.like_rows(ResourceKind::Post, post.id()).await, 0);
    let stored: Post = fx.engine.get(post.id()).await.unwrap();
    assert_eq!(stored.like_count, 0);

    let status = fx
        .likes
        .status(fx.user, ResourceKind::Post, post.id())
        .await
        .unwrap();
    assert!(!status.liked);
}

#[tokio::test]
async fn test_failed_unlike_keeps_the_like() {
    let fx = fixture();
    let thread: Thread = fx
        .engine
        .create(&content_body("community", 0.0, 0.0, "sticky"), fx.user)
        .await
        .unwrap();
    fx.likes
        .toggle(fx.user, ResourceKind::Thread, thread.id())
        .await
        .unwrap();

    fx.store.fail_next_counter_write();
    let result = fx
        .likes
        .toggle(fx.user, ResourceKind::Thread, thread.id())
        .await;
    assert!(matches!(result, Err(AppError::Storage(_))));

    assert_eq!(fx.store.like_rows(ResourceKind::Thread, thread.id()).await, 1);
    let status = fx
        .likes
        .status(fx.user, ResourceKind::Thread, thread.id())
        .await
        .unwrap();
    assert_eq!(status, LikeToggle { liked: true, like_count: 1 });
}

#[tokio::test]
async fn test_count_never_goes_negative() {
    let fx = fixture();
    let post: Post = fx
        .engine
        .create(&content_body("community", 0.0, 0.0, "bouncy"), fx.user)
        .await
        .unwrap();

    for round in 0..7 {
        let outcome = fx
            .likes
            .toggle(fx.user, ResourceKind::Post, post.id())
            .await
            .unwrap();
        assert!(outcome.like_count >= 0);
        assert_eq!(outcome.liked, round % 2 == 0);
        assert_eq!(
            outcome.like_count as usize,
            fx.store.like_rows(ResourceKind::Post, post.id()).await
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_likes_from_distinct_users_all_count() {
    let fx = fixture();
    let event: Event = fx
        .engine
        .create(&content_body("entertainment", 0.0, 0.0, "festival"), fx.user)
        .await
        .unwrap();

    let mut users = Vec::new();
    for i in 0..20 {
        users.push(fx.add_user(&format!("fan{}", i)).await);
    }

    let toggles = users.iter().map(|user| {
        let likes = fx.likes.clone();
        let user = *user;
        let id = event.id();
        tokio::spawn(async move { likes.toggle(user, ResourceKind::Event, id).await })
    });
    let outcomes = futures::future::join_all(toggles).await;

    for outcome in outcomes {
        assert!(outcome.unwrap().unwrap().liked);
    }

    let stored: Event = fx.engine.get(event.id()).await.unwrap();
    assert_eq!(stored.like_count, 20);
    assert_eq!(fx.store.like_rows(ResourceKind::Event, event.id()).await, 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_toggles_by_one_user_keep_count_consistent() {
    let fx = fixture();
    let thread: Thread = fx
        .engine
        .create(&content_body("community", 0.0, 0.0, "race"), fx.user)
        .await
        .unwrap();

    let toggles = (0..9).map(|_| {
        let likes = fx.likes.clone();
        let user = fx.user;
        let id = thread.id();
        tokio::spawn(async move { likes.toggle(user, ResourceKind::Thread, id).await })
    });
    for outcome in futures::future::join_all(toggles).await {
        outcome.unwrap().unwrap();
    }

    // an odd number of serialised toggles leaves exactly one like
    let stored: Thread = fx.engine.get(thread.id()).await.unwrap();
    assert_eq!(stored.like_count, 1);
    assert_eq!(fx.store.like_rows(ResourceKind::Thread, thread.id()).await, 1);
}
