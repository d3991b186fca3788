use chrono::{Duration, Utc};

use portal::domain::password::verify_password;
use portal::domain::repository::UserRepository;
use portal::error::PortalError;
use portal::usecase::password_reset::{
    ConsumeResetTokenInput, ConsumeResetTokenUseCase, IssueResetTokenInput,
    IssueResetTokenUseCase, ValidateResetTokenUseCase,
};

use crate::helpers::{
    MockNotifier, MockUserRepo, TEST_BASE_URL, TEST_PASSWORD, test_user, token_from_link,
    user_with_reset_token,
};

fn issue_usecase(
    users: &MockUserRepo,
    notifier: &MockNotifier,
) -> IssueResetTokenUseCase<MockUserRepo, MockNotifier> {
    IssueResetTokenUseCase {
        users: users.clone(),
        notifier: notifier.clone(),
        public_base_url: TEST_BASE_URL.to_owned(),
    }
}

fn consume(token: &str, password: &str) -> ConsumeResetTokenInput {
    ConsumeResetTokenInput {
        token: token.to_owned(),
        password: password.to_owned(),
    }
}

// ── Issue ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_store_token_and_send_link_for_known_email() {
    let user = test_user();
    let users = MockUserRepo::new(vec![user.clone()]);
    let notifier = MockNotifier::new();

    issue_usecase(&users, &notifier)
        .execute(IssueResetTokenInput {
            email: user.email.clone(),
        })
        .await
        .unwrap();

    let stored = users.get(user.id).unwrap().reset_token.unwrap();
    assert_eq!(stored.token.len(), 64);
    let remaining = stored.expires_at - Utc::now();
    assert!(remaining > Duration::minutes(59) && remaining <= Duration::hours(1));

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].email, user.email);
    assert_eq!(sent[0].name, user.name);
    assert_eq!(
        sent[0].link,
        format!("{TEST_BASE_URL}/reset-password?token={}", stored.token)
    );
}

#[tokio::test]
async fn should_match_email_case_insensitively() {
    let user = test_user();
    let users = MockUserRepo::new(vec![user.clone()]);
    let notifier = MockNotifier::new();

    issue_usecase(&users, &notifier)
        .execute(IssueResetTokenInput {
            email: "  USER@Example.com ".to_owned(),
        })
        .await
        .unwrap();

    assert!(users.get(user.id).unwrap().reset_token.is_some());
}

#[tokio::test]
async fn should_succeed_without_writing_for_unknown_email() {
    let users = MockUserRepo::new(vec![test_user()]);
    let notifier = MockNotifier::new();

    let result = issue_usecase(&users, &notifier)
        .execute(IssueResetTokenInput {
            email: "nobody@example.com".to_owned(),
        })
        .await;

    assert!(result.is_ok(), "expected Ok, got {result:?}");
    assert_eq!(users.write_count(), 0);
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn should_surface_delivery_failure_and_keep_token_valid() {
    let user = test_user();
    let users = MockUserRepo::new(vec![user.clone()]);
    let notifier = MockNotifier::failing();

    let result = issue_usecase(&users, &notifier)
        .execute(IssueResetTokenInput {
            email: user.email.clone(),
        })
        .await;
    assert!(
        matches!(result, Err(PortalError::DependencyFailure(_))),
        "expected DependencyFailure, got {result:?}"
    );

    let stored = users.get(user.id).unwrap().reset_token.unwrap();
    let valid = ValidateResetTokenUseCase {
        users: users.clone(),
    }
    .execute(&stored.token)
    .await
    .unwrap();
    assert!(valid);
}

#[tokio::test]
async fn should_invalidate_previous_token_on_reissue() {
    let user = test_user();
    let users = MockUserRepo::new(vec![user.clone()]);
    let notifier = MockNotifier::new();
    let usecase = issue_usecase(&users, &notifier);

    for _ in 0..2 {
        usecase
            .execute(IssueResetTokenInput {
                email: user.email.clone(),
            })
            .await
            .unwrap();
    }

    let sent = notifier.sent();
    let first = token_from_link(&sent[0].link).to_owned();
    let second = token_from_link(&sent[1].link).to_owned();
    assert_ne!(first, second);

    let validate = ValidateResetTokenUseCase {
        users: users.clone(),
    };
    assert!(!validate.execute(&first).await.unwrap());
    assert!(validate.execute(&second).await.unwrap());

    let result = ConsumeResetTokenUseCase {
        users: users.clone(),
    }
    .execute(consume(&first, "NewPass1!"))
    .await;
    assert!(
        matches!(result, Err(PortalError::InvalidOrExpired)),
        "expected InvalidOrExpired, got {result:?}"
    );
}

// ── Validate ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_validate_token_one_second_before_expiry() {
    let users = MockUserRepo::new(vec![user_with_reset_token("tok", Duration::seconds(1))]);
    let usecase = ValidateResetTokenUseCase { users };
    assert!(usecase.execute("tok").await.unwrap());
}

#[tokio::test]
async fn should_reject_token_one_second_after_expiry() {
    let users = MockUserRepo::new(vec![user_with_reset_token("tok", Duration::seconds(-1))]);
    let usecase = ValidateResetTokenUseCase { users };
    assert!(!usecase.execute("tok").await.unwrap());
}

#[tokio::test]
async fn should_reject_unissued_and_empty_tokens() {
    let users = MockUserRepo::new(vec![user_with_reset_token("tok", Duration::hours(1))]);
    let usecase = ValidateResetTokenUseCase { users };
    assert!(!usecase.execute("other").await.unwrap());
    assert!(!usecase.execute("").await.unwrap());
}

#[tokio::test]
async fn should_not_modify_store_on_validate() {
    let user = user_with_reset_token("tok", Duration::hours(1));
    let users = MockUserRepo::new(vec![user.clone()]);
    let usecase = ValidateResetTokenUseCase {
        users: users.clone(),
    };

    for _ in 0..3 {
        assert!(usecase.execute("tok").await.unwrap());
    }
    assert_eq!(users.write_count(), 0);
    assert_eq!(users.get(user.id).unwrap().reset_token, user.reset_token);
}

// ── Consume ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_replace_password_and_clear_token_on_consume() {
    let mut user = user_with_reset_token("tok", Duration::minutes(30));
    user.first_access = true;
    let users = MockUserRepo::new(vec![user.clone()]);

    ConsumeResetTokenUseCase {
        users: users.clone(),
    }
    .execute(consume("tok", "NewPass1!"))
    .await
    .unwrap();

    let updated = users.get(user.id).unwrap();
    assert!(updated.reset_token.is_none());
    assert!(!updated.first_access);
    assert!(verify_password(&updated.password_hash, "NewPass1!"));
    assert!(!verify_password(&updated.password_hash, TEST_PASSWORD));
}

#[tokio::test]
async fn should_reject_expired_token_on_consume() {
    let user = user_with_reset_token("tok", Duration::seconds(-1));
    let users = MockUserRepo::new(vec![user.clone()]);

    let result = ConsumeResetTokenUseCase {
        users: users.clone(),
    }
    .execute(consume("tok", "NewPass1!"))
    .await;

    assert!(
        matches!(result, Err(PortalError::InvalidOrExpired)),
        "expected InvalidOrExpired, got {result:?}"
    );
    assert_eq!(users.get(user.id).unwrap().password_hash, user.password_hash);
}

#[tokio::test]
async fn should_reject_short_password_before_touching_store() {
    let user = user_with_reset_token("tok", Duration::hours(1));
    let users = MockUserRepo::new(vec![user.clone()]);

    let result = ConsumeResetTokenUseCase {
        users: users.clone(),
    }
    .execute(consume("tok", "short"))
    .await;

    assert!(
        matches!(result, Err(PortalError::InvalidPassword)),
        "expected InvalidPassword, got {result:?}"
    );
    assert_eq!(users.write_count(), 0);
    assert!(users.get(user.id).unwrap().reset_token.is_some());
}

#[tokio::test]
async fn should_reject_empty_token_on_consume() {
    let usecase = ConsumeResetTokenUseCase {
        users: MockUserRepo::empty(),
    };
    let result = usecase.execute(consume("", "NewPass1!")).await;
    assert!(
        matches!(result, Err(PortalError::InvalidOrExpired)),
        "expected InvalidOrExpired, got {result:?}"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn should_consume_exactly_once_under_concurrency() {
    let user = user_with_reset_token("tok", Duration::hours(1));
    let users = MockUserRepo::new(vec![user.clone()]).with_consume_gate(2);

    let attempts = ["FirstPass1!", "SecondPass1!"].map(|password| {
        let usecase = ConsumeResetTokenUseCase {
            users: users.clone(),
        };
        tokio::spawn(async move { (password, usecase.execute(consume("tok", password)).await) })
    });
    let mut results = Vec::new();
    for attempt in attempts {
        results.push(attempt.await.unwrap());
    }

    let winners: Vec<_> = results.iter().filter(|(_, r)| r.is_ok()).collect();
    assert_eq!(winners.len(), 1, "got {results:?}");
    let (_, loser) = results.iter().find(|(_, r)| r.is_err()).unwrap();
    assert!(
        matches!(loser, Err(PortalError::InvalidOrExpired)),
        "expected InvalidOrExpired, got {loser:?}"
    );

    let stored = users.get(user.id).unwrap();
    assert!(verify_password(&stored.password_hash, winners[0].0));
    assert!(stored.reset_token.is_none());
    assert_eq!(users.write_count(), 1);
}

// ── Full lifecycle ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_walk_issue_validate_consume_lifecycle() {
    let user = test_user();
    let users = MockUserRepo::new(vec![user.clone()]);
    let notifier = MockNotifier::new();

    issue_usecase(&users, &notifier)
        .execute(IssueResetTokenInput {
            email: user.email.clone(),
        })
        .await
        .unwrap();
    let token = token_from_link(&notifier.sent()[0].link).to_owned();

    let validate = ValidateResetTokenUseCase {
        users: users.clone(),
    };
    let consume_usecase = ConsumeResetTokenUseCase {
        users: users.clone(),
    };

    assert!(validate.execute(&token).await.unwrap());
    consume_usecase
        .execute(consume(&token, "NewPass1!"))
        .await
        .unwrap();
    assert!(!validate.execute(&token).await.unwrap());

    let again = consume_usecase.execute(consume(&token, "Another1!")).await;
    assert!(
        matches!(again, Err(PortalError::InvalidOrExpired)),
        "expected InvalidOrExpired, got {again:?}"
    );

    let stored = users.find_by_id(user.id).await.unwrap().unwrap();
    assert!(verify_password(&stored.password_hash, "NewPass1!"));
}
