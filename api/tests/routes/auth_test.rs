#[cfg(test)]
mod tests {
    use crate::test_helpers::{crear_usuario, get_json_body, json_request, make_app};
    use axum::http::StatusCode;
    use serde_json::json;
    use serial_test::serial;
    use tower::ServiceExt;

    /// Test Case: Successful registration issues a token and hides secrets
    #[tokio::test]
    #[serial]
    async fn test_register_success() {
        let ctx = make_app().await;

        let payload = json!({
            "nombre": "Laura",
            "apellido": "Gómez",
            "identificacion": "1020304050",
            "correo": "laura@example.com",
            "password": "password123"
        });
        let req = json_request("POST", "/api/auth/register", None, &payload);

        let response = ctx.app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let json = get_json_body(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Usuario registrado exitosamente");
        assert!(json["data"]["token"].as_str().is_some());

        let user = &json["data"]["user"];
        assert_eq!(user["correo"], "laura@example.com");
        assert_eq!(user["rol"], "USER");
        assert_eq!(user["estado"], "activo");
        assert!(user.get("passwordHash").is_none());
    }

    /// Test Case: Validation failures carry per-field messages
    #[tokio::test]
    #[serial]
    async fn test_register_invalid_fields() {
        let ctx = make_app().await;

        let payload = json!({
            "nombre": "",
            "identificacion": "123",
            "correo": "no-es-correo",
            "password": "corta"
        });
        let req = json_request("POST", "/api/auth/register", None, &payload);

        let response = ctx.app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = get_json_body(response).await;
        assert_eq!(json["success"], false);
        let errors: Vec<String> = json["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e.as_str().unwrap().to_string())
            .collect();
        assert!(errors.iter().any(|e| e.contains("nombre")));
        assert!(errors.iter().any(|e| e.contains("correo")));
        assert!(errors.iter().any(|e| e.contains("8 caracteres")));
    }

    /// Test Case: Duplicate correo is rejected with 409
    #[tokio::test]
    #[serial]
    async fn test_register_duplicate_correo() {
        let ctx = make_app().await;
        crear_usuario(&ctx.db).await;

        let payload = json!({
            "nombre": "Otro",
            "apellido": "Nombre",
            "identificacion": "111111",
            "correo": "usuario@test.com",
            "password": "password123"
        });
        let req = json_request("POST", "/api/auth/register", None, &payload);

        let response = ctx.app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let json = get_json_body(response).await;
        assert_eq!(json["message"], "El usuario ya existe");
    }

    /// Test Case: Duplicate identificacion is rejected with 409
    #[tokio::test]
    #[serial]
    async fn test_register_duplicate_identificacion() {
        let ctx = make_app().await;
        crear_usuario(&ctx.db).await;

        let payload = json!({
            "nombre": "Otro",
            "apellido": "Nombre",
            "identificacion": "900002",
            "correo": "distinto@test.com",
            "password": "password123"
        });
        let req = json_request("POST", "/api/auth/register", None, &payload);

        let response = ctx.app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    /// Test Case: Login with valid credentials
    #[tokio::test]
    #[serial]
    async fn test_login_success() {
        let ctx = make_app().await;
        crear_usuario(&ctx.db).await;

        let payload = json!({"correo": "usuario@test.com", "password": "password123"});
        let req = json_request("POST", "/api/auth/login", None, &payload);

        let response = ctx.app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = get_json_body(response).await;
        assert_eq!(json["message"], "Usuario logueado exitosamente");
        assert!(json["data"]["token"].as_str().is_some());
    }

    /// Test Case: Wrong password and unknown correo both answer 401
    #[tokio::test]
    #[serial]
    async fn test_login_bad_credentials() {
        let ctx = make_app().await;
        crear_usuario(&ctx.db).await;

        let payload = json!({"correo": "usuario@test.com", "password": "incorrecta1"});
        let req = json_request("POST", "/api/auth/login", None, &payload);
        let response = ctx.app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = get_json_body(response).await;
        assert_eq!(json["message"], "Credenciales inválidas");

        let payload = json!({"correo": "nadie@test.com", "password": "password123"});
        let req = json_request("POST", "/api/auth/login", None, &payload);
        let response = ctx.app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    /// Test Case: Logout validates the presented token
    #[tokio::test]
    #[serial]
    async fn test_logout() {
        let ctx = make_app().await;
        let (_usuario, token) = crear_usuario(&ctx.db).await;

        let req = json_request("POST", "/api/auth/logout", None, &json!({"token": token}));
        let response = ctx.app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let req = json_request("POST", "/api/auth/logout", None, &json!({}));
        let response = ctx.app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let req = json_request(
            "POST",
            "/api/auth/logout",
            None,
            &json!({"token": "no-es-un-jwt"}),
        );
        let response = ctx.app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    /// Test Case: Reset request mails a token for a known correo, 404 otherwise
    #[tokio::test]
    #[serial]
    async fn test_request_password_reset() {
        let ctx = make_app().await;
        crear_usuario(&ctx.db).await;

        let payload = json!({"correo": "usuario@test.com"});
        let req = json_request("POST", "/api/auth/request-password-reset", None, &payload);
        let response = ctx.app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(ctx.mailer.sent_count(), 1);
        assert!(ctx.mailer.last_token().is_some());

        let payload = json!({"correo": "nadie@test.com"});
        let req = json_request("POST", "/api/auth/request-password-reset", None, &payload);
        let response = ctx.app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(ctx.mailer.sent_count(), 1);
    }

    /// Test Case: Full recovery round trip, then login with the new password
    #[tokio::test]
    #[serial]
    async fn test_reset_password_round_trip() {
        let ctx = make_app().await;
        crear_usuario(&ctx.db).await;

        let payload = json!({"correo": "usuario@test.com"});
        let req = json_request("POST", "/api/auth/request-password-reset", None, &payload);
        ctx.app.clone().oneshot(req).await.unwrap();
        let token = ctx.mailer.last_token().unwrap();

        let payload = json!({"token": token, "newPassword": "renovada456"});
        let req = json_request("POST", "/api/auth/reset-password", None, &payload);
        let response = ctx.app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_json_body(response).await;
        assert_eq!(json["message"], "Contraseña actualizada exitosamente");

        // The old password no longer works; the new one does.
        let payload = json!({"correo": "usuario@test.com", "password": "password123"});
        let req = json_request("POST", "/api/auth/login", None, &payload);
        let response = ctx.app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let payload = json!({"correo": "usuario@test.com", "password": "renovada456"});
        let req = json_request("POST", "/api/auth/login", None, &payload);
        let response = ctx.app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Consumed token cannot be replayed.
        let payload = json!({"token": token, "newPassword": "otra-mas-789"});
        let req = json_request("POST", "/api/auth/reset-password", None, &payload);
        let response = ctx.app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    /// Test Case: Garbage or missing reset fields
    #[tokio::test]
    #[serial]
    async fn test_reset_password_invalid_token() {
        let ctx = make_app().await;

        let payload = json!({"token": "basura", "newPassword": "renovada456"});
        let req = json_request("POST", "/api/auth/reset-password", None, &payload);
        let response = ctx.app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = get_json_body(response).await;
        assert_eq!(json["message"], "Token inválido o expirado");

        let req = json_request("POST", "/api/auth/reset-password", None, &json!({}));
        let response = ctx.app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
