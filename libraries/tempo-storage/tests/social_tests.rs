//! Integration tests for follows, posts, likes and comments


use tempo_core::types::*;
use tempo_core::TempoError;
use tempo_storage::social;
use test_helpers::*;

#[tokio::test]
async fn test_follow_and_unfollow() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice").await;
    let bob = create_test_user(pool, "bob").await;

    social::follow(pool, alice.id, bob.id).await.unwrap();
    // Following twice is harmless
    social::follow(pool, alice.id, bob.id).await.unwrap();

    assert!(social::is_following(pool, alice.id, bob.id).await.unwrap());
    assert!(!social::is_following(pool, bob.id, alice.id).await.unwrap());

    let followers = social::followers(pool, bob.id).await.unwrap();
    assert_eq!(followers.len(), 1);
    assert_eq!(followers[0].user.username, "alice");

    let following = social::following(pool, alice.id).await.unwrap();
    assert_eq!(following.len(), 1);
    assert_eq!(following[0].user.id, bob.id);

    assert!(social::unfollow(pool, alice.id, bob.id).await.unwrap());
    assert!(!social::unfollow(pool, alice.id, bob.id).await.unwrap());
    assert!(social::followers(pool, bob.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_follow_rejects_self_and_unknown_users() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice").await;

    assert!(matches!(
        social::follow(pool, alice.id, alice.id).await,
        Err(TempoError::Validation { .. })
    ));
    assert!(matches!(
        social::follow(pool, alice.id, 9999).await,
        Err(TempoError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_feed_includes_self_and_followed() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice").await;
    let bob = create_test_user(pool, "bob").await;
    let carol = create_test_user(pool, "carol").await;

    social::follow(pool, alice.id, bob.id).await.unwrap();

    let own = social::create_post(
        pool,
        alice.id,
        CreatePost {
            content: "hello".to_string(),
            ..CreatePost::default()
        },
    )
    .await
    .unwrap();
    let followed = social::create_post(
        pool,
        bob.id,
        CreatePost {
            content: "new mix up".to_string(),
            ..CreatePost::default()
        },
    )
    .await
    .unwrap();
    social::create_post(
        pool,
        carol.id,
        CreatePost {
            content: "not followed".to_string(),
            ..CreatePost::default()
        },
    )
    .await
    .unwrap();

    let feed = social::feed(pool, alice.id, 20, 0).await.unwrap();
    let ids: Vec<PostId> = feed.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![followed.id, own.id]);
    assert_eq!(feed[0].author.username, "bob");

    let second_page = social::feed(pool, alice.id, 1, 1).await.unwrap();
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0].id, own.id);
}

#[tokio::test]
async fn test_post_requires_content_and_visible_collection() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice").await;
    let bob = create_test_user(pool, "bob").await;
    let private = create_test_collection(pool, CollectionKind::Playlist, bob.id, "Mine", false).await;
    let public = create_test_collection(pool, CollectionKind::Genre, bob.id, "Ours", true).await;

    let result = social::create_post(pool, alice.id, CreatePost::default()).await;
    assert!(matches!(result, Err(TempoError::Validation { .. })));

    let result = social::create_post(
        pool,
        alice.id,
        CreatePost {
            content: "look".to_string(),
            playlist_id: Some(private.id),
            genre_id: None,
        },
    )
    .await;
    assert!(matches!(result, Err(TempoError::Forbidden(_))));

    let post = social::create_post(
        pool,
        alice.id,
        CreatePost {
            content: "look".to_string(),
            playlist_id: None,
            genre_id: Some(public.id),
        },
    )
    .await
    .unwrap();
    assert_eq!(post.genre_id, Some(public.id));
}

#[tokio::test]
async fn test_likes_toggle() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice").await;
    let bob = create_test_user(pool, "bob").await;

    let post = social::create_post(
        pool,
        alice.id,
        CreatePost {
            content: "like me".to_string(),
            ..CreatePost::default()
        },
    )
    .await
    .unwrap();

    assert!(social::toggle_like(pool, post.id, bob.id).await.unwrap());
    let seen_by_bob = social::get_post(pool, post.id, bob.id).await.unwrap().unwrap();
    assert_eq!(seen_by_bob.like_count, 1);
    assert!(seen_by_bob.liked);

    let seen_by_alice = social::get_post(pool, post.id, alice.id).await.unwrap().unwrap();
    assert!(!seen_by_alice.liked);

    assert!(!social::toggle_like(pool, post.id, bob.id).await.unwrap());
    let after = social::get_post(pool, post.id, bob.id).await.unwrap().unwrap();
    assert_eq!(after.like_count, 0);

    assert!(matches!(
        social::toggle_like(pool, 9999, bob.id).await,
        Err(TempoError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_comments_and_deletion_rights() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice").await;
    let bob = create_test_user(pool, "bob").await;

    let post = social::create_post(
        pool,
        alice.id,
        CreatePost {
            content: "thoughts?".to_string(),
            ..CreatePost::default()
        },
    )
    .await
    .unwrap();

    let comment = social::add_comment(pool, post.id, bob.id, "  great  ").await.unwrap();
    assert_eq!(comment.content, "great");
    assert_eq!(comment.author.id, bob.id);

    assert!(matches!(
        social::add_comment(pool, post.id, bob.id, " ").await,
        Err(TempoError::Validation { .. })
    ));

    let comments = social::list_comments(pool, post.id).await.unwrap();
    assert_eq!(comments.len(), 1);
    let with_count = social::get_post(pool, post.id, alice.id).await.unwrap().unwrap();
    assert_eq!(with_count.comment_count, 1);

    assert!(matches!(
        social::delete_comment(pool, comment.id, alice.id).await,
        Err(TempoError::Forbidden(_))
    ));
    social::delete_comment(pool, comment.id, bob.id).await.unwrap();
    assert!(social::list_comments(pool, post.id).await.unwrap().is_empty());

    assert!(matches!(
        social::delete_post(pool, post.id, bob.id).await,
        Err(TempoError::Forbidden(_))
    ));
    social::delete_post(pool, post.id, alice.id).await.unwrap();
    assert!(social::get_post(pool, post.id, alice.id).await.unwrap().is_none());
}
