use client_lib::adapters::{HttpStudyApi, StubAuthenticator};
use client_lib::view::{shell::UiFlags, Flow, Shell};
use std::sync::Arc;
use study_assistant_core::StudyStore;

fn shell_for(server: &mockito::ServerGuard) -> Shell<Vec<u8>> {
    let api = Arc::new(HttpStudyApi::new(server.url()).unwrap());
    let store = Arc::new(StudyStore::new(api, Arc::new(StubAuthenticator)));
    Shell::new(store, Vec::new())
}

async fn run_script(shell: Shell<Vec<u8>>, script: &str) -> String {
    let mut shell = shell;
    shell.run(script.as_bytes()).await.unwrap();
    String::from_utf8(shell.into_output()).unwrap()
}

async fn mock_folder_list(server: &mut mockito::ServerGuard) -> mockito::Mock {
    server
        .mock("GET", "/folders")
        .with_status(200)
        .with_body(r#"[{"id":"64aa","name":"Algebra"}]"#)
        .create_async()
        .await
}

#[tokio::test]
async fn protected_commands_redirect_to_login() {
    let mut server = mockito::Server::new_async().await;
    let folders = server
        .mock("GET", "/folders")
        .expect(0)
        .create_async()
        .await;

    let output = run_script(shell_for(&server), "folders\nmkdir Algebra\nquit\n").await;

    folders.assert_async().await;
    assert_eq!(output.matches("Please sign in first").count(), 2);
}

#[tokio::test]
async fn login_shows_the_dashboard() {
    let mut server = mockito::Server::new_async().await;
    let _folders = mock_folder_list(&mut server).await;

    let output = run_script(shell_for(&server), "login ada@example.com secret\n").await;

    assert!(output.contains("Welcome, ada!"));
    assert!(output.contains("[64aa] Algebra (0 notes, 0 messages)"));
}

#[tokio::test]
async fn asking_records_both_sides_of_the_chat() {
    let mut server = mockito::Server::new_async().await;
    let _folders = mock_folder_list(&mut server).await;
    let _mock = server
        .mock("POST", "/resources/r1/chat")
        .with_status(200)
        .with_body(r#"{"content":"A magnitude with a direction."}"#)
        .create_async()
        .await;

    let output = run_script(
        shell_for(&server),
        "login ada@example.com pw\nask 64aa r1 What is a vector?\nhistory 64aa\n",
    )
    .await;

    assert!(output.contains("assistant: A magnitude with a direction."));
    assert!(output.contains("user: What is a vector?\nassistant: A magnitude with a direction."));
}

#[tokio::test]
async fn rejected_delete_is_shown_and_folder_kept() {
    let mut server = mockito::Server::new_async().await;
    let _folders = mock_folder_list(&mut server).await;
    let _mock = server
        .mock("DELETE", "/folders/64aa")
        .with_status(404)
        .with_body(r#"{"detail":"Folder not found"}"#)
        .create_async()
        .await;
    let mut shell = shell_for(&server);

    shell.execute("login ada@example.com pw").await.unwrap();
    let flow = shell.execute("rmdir 64aa").await.unwrap();
    shell.execute("folders").await.unwrap();

    assert_eq!(flow, Flow::Continue);
    let output = String::from_utf8(shell.into_output()).unwrap();
    let alert = output.find("Error: Folder not found (status 404)").unwrap();
    assert!(output[alert..].contains("[64aa] Algebra"));
}

#[tokio::test]
async fn failed_generation_resets_busy_flags() {
    let mut server = mockito::Server::new_async().await;
    let _folders = mock_folder_list(&mut server).await;
    let _mock = server
        .mock("POST", "/resources/r1/generate-notes")
        .with_status(500)
        .with_body("oops")
        .create_async()
        .await;
    let mut shell = shell_for(&server);

    shell.execute("login ada@example.com pw").await.unwrap();
    shell.execute("notes 64aa r1").await.unwrap();

    assert_eq!(shell.ui_flags(), UiFlags::default());
    let output = String::from_utf8(shell.into_output()).unwrap();
    assert!(output.contains("Error: HTTP error! status: 500 (status 500)"));
}

#[tokio::test]
async fn generated_plan_is_stored_on_the_folder() {
    let mut server = mockito::Server::new_async().await;
    let _folders = mock_folder_list(&mut server).await;
    let _mock = server
        .mock("POST", "/resources/r1/generate-study-plan")
        .with_status(200)
        .with_body(r#"{"study_plan":{"weeks":[{"week":1,"topics":["Vectors"],"hours":3}]}}"#)
        .create_async()
        .await;
    let _mock = server
        .mock("GET", "/folders/64aa")
        .with_status(200)
        .with_body(r#"{"id":"64aa","name":"Algebra","resources":[{"id":"r1","resource_type":"pdf","source_id":"la.pdf"}]}"#)
        .create_async()
        .await;

    let output = run_script(
        shell_for(&server),
        "login ada@example.com pw\nplan 64aa r1 intermediate visual\nopen 64aa\n",
    )
    .await;

    assert!(output.contains("Week 1 (3h): Vectors"));
    assert!(output.contains("r1  pdf      la.pdf"));
    assert!(output.contains("1-week study plan"));
}

#[tokio::test]
async fn unknown_resource_types_are_rejected() {
    let mut server = mockito::Server::new_async().await;
    let _folders = mock_folder_list(&mut server).await;

    let output = run_script(
        shell_for(&server),
        "login ada@example.com pw\nadd 64aa vimeo https://vimeo.com/1\n",
    )
    .await;

    assert!(output.contains("unknown resource type: vimeo"));
}

#[tokio::test]
async fn answers_show_their_sources() {
    let mut server = mockito::Server::new_async().await;
    let _folders = mock_folder_list(&mut server).await;
    let _mock = server
        .mock("POST", "/resources/r1/chat")
        .with_status(200)
        .with_body(
            r#"{"answer":"A magnitude with a direction.","sources":[{"content":"Vectors have magnitude and direction.","metadata":{"source":"la.pdf"}}]}"#,
        )
        .create_async()
        .await;

    let output = run_script(
        shell_for(&server),
        "login ada@example.com pw\nask 64aa r1 What is a vector?\n",
    )
    .await;

    assert!(output.contains(
        "assistant: A magnitude with a direction.\nSources:\n  [1] la.pdf: Vectors have magnitude and direction."
    ));
}

#[tokio::test]
async fn asking_in_an_unknown_folder_is_rejected() {
    let mut server = mockito::Server::new_async().await;
    let _folders = mock_folder_list(&mut server).await;
    let chat = server
        .mock("POST", "/resources/r1/chat")
        .expect(0)
        .create_async()
        .await;

    let output = run_script(
        shell_for(&server),
        "login ada@example.com pw\nask 999 r1 Anyone there?\n",
    )
    .await;

    chat.assert_async().await;
    assert!(output.contains("Error: Folder 999 not found"));
}
