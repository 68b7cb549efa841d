use playcheck::{BootReason, BootRequiredError, Outcome, PlayStoreError, Verifier};
use serde_json::json;
use time::macros::datetime;
use wiremock::{
    matchers::{method, path},
    Mock, ResponseTemplate,
};

use super::{
    insufficient_permissions, mock_token_failure, mock_token_success, product_purchase_json,
    setup_test_environment,
};

#[tokio::test]
async fn test_verify_product_end_to_end() {
    let env = setup_test_environment().await;
    mock_token_success(&env.server).await;

    Mock::given(method("GET"))
        .and(path(env.purchase_path("products", "the_product", "the_token")))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_purchase_json()))
        .expect(1)
        .mount(&env.server)
        .await;

    let mut verifier = Verifier::from_config(env.key_file.path(), &env.config());
    verifier.boot().await.unwrap();

    let outcome = verifier
        .verify("the_package", "the_product", "the_token")
        .await
        .unwrap();

    let receipt = outcome.success().expect("expected a receipt");
    assert!(receipt.valid());
    assert!(!receipt.consumed());
    assert!(receipt.acknowledged());
    assert_eq!(
        receipt.purchased_at(),
        Some(datetime!(2015-01-19 14:03:57 UTC))
    );
}

#[tokio::test]
async fn test_verify_subscription_end_to_end() {
    let env = setup_test_environment().await;
    mock_token_success(&env.server).await;

    Mock::given(method("GET"))
        .and(path(env.purchase_path("subscriptions", "the_sub", "the_token")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "androidpublisher#subscriptionPurchase",
            "startTimeMillis": "1459540113244",
            "expiryTimeMillis": "1462132088610",
            "autoRenewing": false,
            "developerPayload": "payload that gets stored and returned",
            "cancelReason": 0,
            "paymentState": "1",
            "acknowledgementState": 1
        })))
        .mount(&env.server)
        .await;

    let mut verifier = Verifier::from_config(env.key_file.path(), &env.config());
    verifier.boot().await.unwrap();

    let outcome = verifier
        .verify_subscription("the_package", "the_sub", "the_token")
        .await
        .unwrap();

    let subscription = outcome.success().expect("expected a subscription");
    assert!(subscription.expired());
    assert!(subscription.canceled_by_user());
    assert!(subscription.payment_received());
    assert!(subscription.acknowledged());
}

#[tokio::test]
async fn test_api_failure_is_returned_not_raised() {
    let env = setup_test_environment().await;
    mock_token_success(&env.server).await;

    Mock::given(method("GET"))
        .and(path(env.purchase_path("products", "the_product", "the_token")))
        .respond_with(insufficient_permissions())
        .mount(&env.server)
        .await;

    let mut verifier = Verifier::from_config(env.key_file.path(), &env.config());
    verifier.boot().await.unwrap();

    let outcome = verifier
        .verify("the_package", "the_product", "the_token")
        .await
        .unwrap();

    match outcome {
        Outcome::Failure(failure) => {
            assert_eq!(failure.code(), Some(401));
            assert!(failure.message().contains("insufficient permissions"));
        }
        Outcome::Success(receipt) => panic!("expected a failure, got {:?}", receipt),
    }
}

#[tokio::test]
async fn test_failed_boot_is_fatal_and_final() {
    let env = setup_test_environment().await;
    mock_token_failure(&env.server).await;

    let mut verifier = Verifier::from_config(env.key_file.path(), &env.config());

    let err = verifier.boot().await.unwrap_err();
    assert!(matches!(err, PlayStoreError::Authorization(_)));

    let err = verifier.boot().await.unwrap_err();
    assert!(matches!(
        err,
        PlayStoreError::BootRequired(BootRequiredError {
            reason: BootReason::AlreadyBooted,
            ..
        })
    ));

    let err = verifier
        .verify("the_package", "the_product", "the_token")
        .await
        .unwrap_err();
    assert_eq!(err.reason, BootReason::NotBooted);
}
