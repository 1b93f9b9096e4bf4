use docfetch::{download_archive, FetchError};
use reqwest::Client;
use tempfile::tempdir;

#[tokio::test]
async fn existing_file_short_circuits_the_request() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("docs.zip");
    std::fs::write(&dest, b"cached bytes").unwrap();

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/docs.zip")
        .with_status(200)
        .with_body("fresh bytes")
        .expect(0)
        .create_async()
        .await;

    let url = format!("{}/docs.zip", server.url());
    let path = download_archive(&Client::new(), &url, &dest).await.unwrap();

    assert_eq!(path, dest);
    assert_eq!(std::fs::read(&dest).unwrap(), b"cached bytes");
    mock.assert_async().await;
}

#[tokio::test]
async fn second_call_reuses_the_downloaded_file() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("docs.zip");

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/docs.zip")
        .with_status(200)
        .with_body("archive body")
        .expect(1)
        .create_async()
        .await;

    let url = format!("{}/docs.zip", server.url());
    let client = Client::new();
    download_archive(&client, &url, &dest).await.unwrap();
    download_archive(&client, &url, &dest).await.unwrap();

    assert_eq!(std::fs::read(&dest).unwrap(), b"archive body");
    mock.assert_async().await;
}

#[tokio::test]
async fn non_success_status_is_an_error_and_leaves_no_file() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("docs.zip");

    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/docs.zip")
        .with_status(404)
        .create_async()
        .await;

    let url = format!("{}/docs.zip", server.url());
    let err = download_archive(&Client::new(), &url, &dest)
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Status { .. }));
    assert!(!dest.exists());
}
