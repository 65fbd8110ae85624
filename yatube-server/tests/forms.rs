#[macro_use]
mod common;

use actix_web::test;

use common::{Fixture, location, rendered};

#[actix_web::test]
async fn valid_create_form_adds_a_post() {
    let fixture = Fixture::new();
    let author = fixture.user("StasBasov").await;
    let group = fixture.group("Тестовая группа", "test-slug").await;
    let app = init_app!(fixture);
    let before = fixture.post_count().await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/create/")
            .insert_header(fixture.login_as(&author))
            .set_form([("text", "Тестовый текст".to_string()), ("group", group.id.to_string())])
            .to_request(),
    )
    .await;

    assert_eq!(location(&resp), "/profile/StasBasov/");
    assert_eq!(fixture.post_count().await, before + 1);
    let created = &fixture.all_posts().await[0];
    assert_eq!(created.text, "Тестовый текст");
    assert_eq!(created.author.id, author.id);
    assert_eq!(created.group.as_ref().map(|g| g.id), Some(group.id));
}

#[actix_web::test]
async fn create_form_without_group_is_valid() {
    let fixture = Fixture::new();
    let author = fixture.user("StasBasov").await;
    let app = init_app!(fixture);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/create/")
            .insert_header(fixture.login_as(&author))
            .set_form([("text", "Без группы"), ("group", "")])
            .to_request(),
    )
    .await;

    assert_eq!(location(&resp), "/profile/StasBasov/");
    assert!(fixture.all_posts().await[0].group.is_none());
}

#[actix_web::test]
async fn invalid_create_form_is_shown_again() {
    let fixture = Fixture::new();
    let author = fixture.user("StasBasov").await;
    let app = init_app!(fixture);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/create/")
            .insert_header(fixture.login_as(&author))
            .set_form([("text", "   "), ("group", "9999")])
            .to_request(),
    )
    .await;

    let (template, context) = rendered(resp).await;
    assert_eq!(template, "posts/create_post.html");
    assert_eq!(context["form"]["errors"]["text"][0], "This field is required.");
    assert!(context["form"]["errors"]["group"].is_array());
    assert_eq!(fixture.post_count().await, 0);
}

#[actix_web::test]
async fn guest_cannot_create_posts() {
    let fixture = Fixture::new();
    fixture.user("StasBasov").await;
    let app = init_app!(fixture);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/create/")
            .set_form([("text", "Гость"), ("group", "")])
            .to_request(),
    )
    .await;

    assert_eq!(location(&resp), "/auth/login/?next=/create/");
    assert_eq!(fixture.post_count().await, 0);
}

#[actix_web::test]
async fn author_edits_post() {
    let fixture = Fixture::new();
    let author = fixture.user("StasBasov").await;
    let group = fixture.group("Тестовая группа", "test-slug").await;
    let post = fixture.post(&author, "Тестовый пост", Some(&group)).await;
    let app = init_app!(fixture);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/edit/", post.id))
            .insert_header(fixture.login_as(&author))
            .set_form([("text", "Изменённый текст"), ("group", "")])
            .to_request(),
    )
    .await;

    assert_eq!(location(&resp), format!("/posts/{}/", post.id));
    assert_eq!(fixture.post_count().await, 1);
    let edited = fixture.find_post(post.id).await.unwrap();
    assert_eq!(edited.text, "Изменённый текст");
    assert!(edited.group.is_none());
    assert_eq!(edited.created_at, post.created_at);
}

#[actix_web::test]
async fn only_the_author_can_edit() {
    let fixture = Fixture::new();
    let author = fixture.user("StasBasov").await;
    let stranger = fixture.user("HasNoName").await;
    let post = fixture.post(&author, "Тестовый пост", None).await;
    let app = init_app!(fixture);
    let edit = format!("/posts/{}/edit/", post.id);

    let as_stranger = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&edit)
            .insert_header(fixture.login_as(&stranger))
            .set_form([("text", "Взлом"), ("group", "")])
            .to_request(),
    )
    .await;
    assert_eq!(location(&as_stranger), format!("/posts/{}/", post.id));

    let as_guest = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&edit)
            .set_form([("text", "Взлом"), ("group", "")])
            .to_request(),
    )
    .await;
    assert_eq!(location(&as_guest), format!("/auth/login/?next={edit}"));

    assert_eq!(fixture.find_post(post.id).await.unwrap().text, "Тестовый пост");
}

#[actix_web::test]
async fn invalid_edit_keeps_the_post() {
    let fixture = Fixture::new();
    let author = fixture.user("StasBasov").await;
    let post = fixture.post(&author, "Тестовый пост", None).await;
    let app = init_app!(fixture);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/edit/", post.id))
            .insert_header(fixture.login_as(&author))
            .set_form([("text", ""), ("group", "")])
            .to_request(),
    )
    .await;

    let (_, context) = rendered(resp).await;
    assert_eq!(context["is_edit"], true);
    assert!(context["form"]["errors"]["text"].is_array());
    assert_eq!(fixture.find_post(post.id).await.unwrap().text, "Тестовый пост");
}
