// SPDX-License-Identifier: MPL-2.0
use iced::widget::text;
use iced_toasts::config;
use iced_toasts::ui::toasts::{
    api, create_toast_stack, BackBehavior, CloseTarget, ClosingActionKind, Position, Registry,
    StateUpdate, ToastComponent, ToastEntry, ToastOptions, ToastProvider, ToastStore,
};
use iced_toasts::Error;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tempfile::tempdir;

#[derive(Debug, Clone)]
enum AppMessage {
    Toast(iced_toasts::ui::toasts::Message),
}

fn label() -> ToastComponent<AppMessage> {
    ToastComponent::new(|props| text(props.name()).into())
}

fn success_and_error() -> Registry<AppMessage> {
    create_toast_stack(
        [
            ("Success", ToastEntry::from(label())),
            ("Error", ToastEntry::from(label())),
        ],
        None,
    )
    .expect("valid registry")
}

fn store() -> ToastStore<AppMessage> {
    ToastStore::with_registry(success_and_error())
}

#[test]
fn test_open_close_walkthrough() {
    let mut store = store();

    store
        .open("Success", Some(json!("ok")), None)
        .expect("Success is registered");
    assert_eq!(store.state().open_count(), 1);
    assert_eq!(store.current(), Some("Success"));

    store.open("Error", None, None).expect("Error is registered");
    assert_eq!(store.state().open_count(), 2);
    assert_eq!(store.current(), Some("Error"));

    store.close_by_name("Success").expect("registered name");
    assert_eq!(store.state().open_count(), 1);
    assert_eq!(store.current(), Some("Error"));
    assert_eq!(store.state().open_instances()[0].name(), "Error");

    store.close_all();
    assert_eq!(store.state().open_count(), 0);
    assert_eq!(store.current(), None);
}

#[test]
fn test_unknown_name_is_rejected() {
    let mut store = store();
    let error = store.open("Unknown", None, None).expect_err("not registered");

    assert_eq!(
        error,
        Error::UnknownName {
            name: "Unknown".into(),
            valid: vec!["Success".into(), "Error".into()],
        }
    );
    assert_eq!(store.state().open_count(), 0);
}

#[test]
fn test_close_latest_is_lifo_across_names() {
    let mut store = store();
    let first = store.open("Error", None, None).expect("open");
    let second = store.open("Success", None, None).expect("open");
    let third = store.open("Error", None, None).expect("open");

    assert_eq!(store.close_latest(), Some(third));
    assert_eq!(store.close(CloseTarget::Latest), Ok(Some(second)));
    assert_eq!(store.close_latest(), Some(first));
    assert_eq!(store.close_latest(), None);
}

#[test]
fn test_duplicate_opens_are_independent() {
    let mut store = store();
    let a = store.open("Success", None, None).expect("open");
    let b = store.open("Success", None, None).expect("open");
    assert_ne!(a, b);

    assert!(store.close_instance(&a));
    assert!(store.state().is_open(&b));
    assert!(!store.close_instance(&a));
}

#[test]
fn test_close_all_of_name_reports_removal() {
    let mut store = store();
    store.open("Success", None, None).expect("open");
    store.open("Error", None, None).expect("open");
    store.open("Success", None, None).expect("open");

    assert_eq!(store.close_all_of_name("Success"), Ok(true));
    assert_eq!(store.state().open_count(), 1);

    let before = Rc::clone(store.state());
    assert_eq!(store.close_all_of_name("Success"), Ok(false));
    assert!(Rc::ptr_eq(&before, store.state()));
}

#[test]
fn test_close_all_is_idempotent() {
    let mut store = store();
    store.open("Success", None, None).expect("open");
    store.open("Error", None, None).expect("open");

    assert_eq!(store.close_all(), 2);
    assert_eq!(store.close_all(), 0);
    assert_eq!(store.current(), None);
}

#[test]
fn test_get_param_never_fails() {
    let mut store = store();
    let id = store
        .open("Error", Some(json!({ "title": "Oops" })), None)
        .expect("open");

    assert_eq!(store.get_param(&id, "title", None), Some(json!("Oops")));
    assert_eq!(
        store.get_param(&id, "missing", Some(json!("fallback"))),
        Some(json!("fallback"))
    );
    store.close_instance(&id);
    assert_eq!(store.get_param(&id, "title", Some(json!(1))), Some(json!(1)));
}

#[test]
fn test_subscriber_sees_each_mutation_once() {
    let mut store = store();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    store.subscribe(move |update| {
        if let StateUpdate::Changed(state) = update {
            sink.borrow_mut().push(state.open_count());
        }
        Ok(())
    });

    store.open("Success", None, None).expect("open");
    store.open("Error", None, None).expect("open");
    store.close_latest();
    store.close_all();
    store.close_all();

    assert_eq!(*seen.borrow(), vec![1, 2, 1, 0]);
}

#[test]
fn test_queued_close_runs_once() {
    let mut store = store();
    store.open("Success", None, None).expect("open");
    let action = store
        .queue_closing_action(ClosingActionKind::CloseOne, Some("Success"), None)
        .expect("registered name");

    assert_eq!(store.run_closing_action(&action), Ok(true));
    assert_eq!(store.run_closing_action(&action), Ok(false));
    assert_eq!(store.current(), None);
}

#[test]
fn test_provider_drives_the_store_through_messages() {
    let mut provider = ToastProvider::new(success_and_error(), AppMessage::Toast);

    provider.update(api::open_with_params("Success", json!({ "text": "saved" })));
    provider.update(api::open("Error"));
    assert_eq!(provider.current_toast(), Some("Error"));

    provider.update(api::close_by_name("Error"));
    provider.update(api::back());
    let now = Instant::now();
    provider.update(iced_toasts::ui::toasts::Message::Tick(now));
    // Both requests targeted the same Error toast.
    assert_eq!(provider.current_toast(), Some("Success"));

    provider.update(api::close_all());
    provider.update(iced_toasts::ui::toasts::Message::Tick(
        now + Duration::from_secs(2),
    ));
    assert_eq!(provider.current_toast(), None);
    assert!(!provider.is_active());
}

#[test]
fn test_queries_and_close_callbacks_go_through_the_provider() {
    let mut provider = ToastProvider::new(success_and_error(), AppMessage::Toast);
    provider.update(api::open_with_params("Success", json!({ "text": "saved" })));

    let id = provider
        .store()
        .state()
        .latest()
        .map(|instance| instance.id().clone())
        .expect("opened through a message");
    assert_eq!(provider.current_toast(), Some("Success"));
    assert_eq!(provider.get_param(&id, "text", None), Some(json!("saved")));

    let closed = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&closed);
    provider
        .close_toast(
            CloseTarget::Name("Success".into()),
            Some(Rc::new(move || sink.borrow_mut().push("Success"))),
        )
        .expect("registered name");
    provider.update(iced_toasts::ui::toasts::Message::Tick(Instant::now()));
    assert_eq!(*closed.borrow(), ["Success"]);
    assert_eq!(provider.current_toast(), None);
}

#[test]
fn test_empty_stack_opens_nothing() {
    let registry = create_toast_stack(Vec::<(&str, ToastEntry<AppMessage>)>::new(), None)
        .expect("empty configuration is valid");
    let mut store = ToastStore::with_registry(registry);

    let err = store.open("Success", None, None).unwrap_err();
    assert!(matches!(err, Error::UnknownName { valid, .. } if valid.is_empty()));
}

#[test]
fn test_defaults_file_feeds_the_registry() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("toasts.toml");
    std::fs::write(
        &path,
        "position = \"bottom\"\nback_behavior = \"clear\"\nduration_ms = 0\n",
    )
    .expect("Failed to write defaults file");

    let defaults = config::load_from_path(&path).expect("valid defaults file");
    let registry = Registry::builder()
        .toast("Info", label())
        .toast_with_options(
            "Pinned",
            label(),
            ToastOptions::new().with_position(Position::Top),
        )
        .defaults(defaults)
        .build()
        .expect("valid registry");
    let mut store = ToastStore::with_registry(registry);

    let info = store.open("Info", None, None).expect("open");
    let pinned = store.open("Pinned", None, None).expect("open");
    let state = Rc::clone(store.state());
    let info = state.instance(&info).expect("open").options();
    let pinned = state.instance(&pinned).expect("open").options();

    assert_eq!(info.position, Position::Bottom);
    assert_eq!(info.back_behavior, BackBehavior::Clear);
    assert_eq!(info.duration, None);
    assert_eq!(pinned.position, Position::Top);
}
