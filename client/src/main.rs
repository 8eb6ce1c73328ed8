//! Scripted CLI demo of the storefront flow.
//!
//! Drives the navigation store through a full session against the in-memory
//! marketplace: browse → guarded checkout → sign in → checkout → payment,
//! printing the state between steps. Run with `RUST_LOG=debug` for the
//! reducer's view of the same flow.

use skillsphere_client::mocks::MockStorefrontApi;
use skillsphere_client::navigation::actions::LoginField;
use skillsphere_client::prelude::*;
use skillsphere_runtime::Store;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== SkillSphere Storefront Demo ===\n");

    let sessions = Arc::new(SessionStore::in_memory());
    let api = Arc::new(
        MockStorefrontApi::with_sample_catalog()
            .with_account("Ada Lovelace", "ada@example.com", "secret123", "student")
            .with_purchased(CourseId::new("c-negotiation")),
    );
    let env = NavigationEnvironment::new(
        api,
        Arc::clone(&sessions),
        SimulatedPaymentProcessor::shared(
            Duration::from_millis(200),
            Arc::new(skillsphere_core::environment::SystemClock),
        ),
        Duration::from_millis(300),
    );

    let store = Store::new(
        NavigationState::with_session(sessions.get()),
        NavigationReducer::new(),
        env,
    );

    // Browse to a course
    println!("Viewing course c-leadership...");
    let mut handle = store
        .send(NavigationAction::ViewCourse {
            id: CourseId::new("c-leadership"),
        })
        .await?;
    handle.wait().await;
    store
        .state(|s| {
            if let Some(course) = &s.selected_course {
                println!("  On {:?}: {} (${:.2})", s.page, course.title, course.price);
            }
        })
        .await;

    // Checkout before signing in: allowed, but payment is locked
    let mut handle = store.send(NavigationAction::StartCheckout).await?;
    handle.wait().await;
    let mut handle = store.send(NavigationAction::ProceedToPayment).await?;
    handle.wait().await;
    store
        .state(|s| {
            if let Some(flash) = &s.flash {
                println!("  Guard: {}", flash.text());
            }
        })
        .await;

    // Sign in
    println!("\nSigning in as ada@example.com...");
    store
        .send(NavigationAction::LoginFieldChanged {
            field: LoginField::Email,
            value: "ada@example.com".to_string(),
        })
        .await?;
    store
        .send(NavigationAction::LoginFieldChanged {
            field: LoginField::Password,
            value: "secret123".to_string(),
        })
        .await?;
    let result = store
        .send_and_wait_for(
            NavigationAction::SubmitLogin,
            |a| {
                matches!(
                    a,
                    NavigationAction::LoginSucceeded { .. } | NavigationAction::LoginFailed { .. }
                )
            },
            Duration::from_secs(5),
        )
        .await?;
    // Let the result action finish reducing before reading state
    tokio::time::sleep(Duration::from_millis(20)).await;
    match result {
        NavigationAction::LoginSucceeded { .. } => {
            println!("  Signed in; session token persisted: {}", sessions.is_authenticated());
        },
        other => println!("  Login did not complete: {other:?}"),
    }

    // My courses is now reachable
    let mut handle = store.send(NavigationAction::SetPage(Page::MyCourses)).await?;
    handle.wait().await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    store
        .state(|s| {
            if let Some(purchased) = &s.purchased {
                println!("  Purchased courses: {}", purchased.pagination.total_courses);
            }
        })
        .await;

    // Buy the leadership course
    println!("\nChecking out c-leadership...");
    let mut handle = store
        .send(NavigationAction::ViewCourse {
            id: CourseId::new("c-leadership"),
        })
        .await?;
    handle.wait().await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    store.send(NavigationAction::StartCheckout).await?;
    store.send(NavigationAction::ProceedToPayment).await?;

    for (field, value) in [
        (PaymentField::CardNumber, "4242424242424242"),
        (PaymentField::ExpiryDate, "1226"),
        (PaymentField::Cvv, "123"),
        (PaymentField::CardName, "Ada Lovelace"),
    ] {
        store
            .send(NavigationAction::PaymentFieldChanged {
                field,
                value: value.to_string(),
            })
            .await?;
    }

    println!("Submitting payment...");
    let completion = store
        .send_and_wait_for(
            NavigationAction::SubmitPayment,
            |a| matches!(a, NavigationAction::PaymentRedirectElapsed { .. }),
            Duration::from_secs(10),
        )
        .await?;
    tokio::time::sleep(Duration::from_millis(20)).await;
    println!("  Payment flow completed: {completion:?}");

    store
        .state(|s| {
            println!("\nBack on {:?}", s.page);
            if let Some(flash) = &s.flash {
                println!("  {}", flash.text());
            }
        })
        .await;

    store.shutdown(Duration::from_secs(2)).await?;
    println!("\n=== Demo Complete ===");
    Ok(())
}
