use playcheck::{Acknowledger, BootReason, Outcome};
use wiremock::{
    matchers::{method, path},
    Mock, ResponseTemplate,
};

use super::{
    insufficient_permissions, mock_token_success, product_purchase_json, setup_test_environment,
};

#[tokio::test]
async fn test_acknowledge_product_reads_purchase_back() {
    let env = setup_test_environment().await;
    mock_token_success(&env.server).await;

    let purchase_path = env.purchase_path("products", "the_product", "the_token");

    Mock::given(method("POST"))
        .and(path(format!("{}:acknowledge", purchase_path)))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&env.server)
        .await;

    Mock::given(method("GET"))
        .and(path(purchase_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_purchase_json()))
        .expect(1)
        .mount(&env.server)
        .await;

    let mut acknowledger = Acknowledger::from_config(env.key_file.path(), &env.config());
    acknowledger.boot().await.unwrap();

    let outcome = acknowledger
        .acknowledge("the_package", "the_product", "the_token")
        .await
        .unwrap();

    let receipt = outcome.success().expect("expected a receipt");
    assert!(receipt.valid());
    assert!(receipt.acknowledged());
}

#[tokio::test]
async fn test_accepted_acknowledgement_succeeds_when_read_back_fails() {
    let env = setup_test_environment().await;
    mock_token_success(&env.server).await;

    let purchase_path = env.purchase_path("products", "the_product", "the_token");

    Mock::given(method("POST"))
        .and(path(format!("{}:acknowledge", purchase_path)))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&env.server)
        .await;

    Mock::given(method("GET"))
        .and(path(purchase_path))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&env.server)
        .await;

    let mut acknowledger = Acknowledger::from_config(env.key_file.path(), &env.config());
    acknowledger.boot().await.unwrap();

    let outcome = acknowledger
        .acknowledge("the_package", "the_product", "the_token")
        .await
        .unwrap();

    let receipt = outcome.success().expect("expected a receipt");
    assert!(receipt.acknowledged());
    assert_eq!(receipt.raw().product_id.as_deref(), Some("the_product"));
}

#[tokio::test]
async fn test_acknowledge_subscription_returns_true() {
    let env = setup_test_environment().await;
    mock_token_success(&env.server).await;

    Mock::given(method("POST"))
        .and(path(format!(
            "{}:acknowledge",
            env.purchase_path("subscriptions", "the_sub", "the_token")
        )))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&env.server)
        .await;

    let mut acknowledger = Acknowledger::from_config(env.key_file.path(), &env.config());
    acknowledger.boot().await.unwrap();

    let outcome = acknowledger
        .acknowledge_subscription("the_package", "the_sub", "the_token")
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Success(true));
}

#[tokio::test]
async fn test_acknowledge_subscription_failure() {
    let env = setup_test_environment().await;
    mock_token_success(&env.server).await;

    Mock::given(method("POST"))
        .and(path(format!(
            "{}:acknowledge",
            env.purchase_path("subscriptions", "the_sub", "the_token")
        )))
        .respond_with(insufficient_permissions())
        .mount(&env.server)
        .await;

    let mut acknowledger = Acknowledger::from_config(env.key_file.path(), &env.config());
    acknowledger.boot().await.unwrap();

    let outcome = acknowledger
        .acknowledge_subscription("the_package", "the_sub", "the_token")
        .await
        .unwrap();

    let failure = outcome.failure().expect("expected a failure");
    assert_eq!(failure.code(), Some(401));
}

#[tokio::test]
async fn test_acknowledge_before_boot_fails() {
    let env = setup_test_environment().await;

    let acknowledger = Acknowledger::from_config(env.key_file.path(), &env.config());

    let err = acknowledger
        .acknowledge("the_package", "the_product", "the_token")
        .await
        .unwrap_err();

    assert_eq!(err.reason, BootReason::NotBooted);
}
