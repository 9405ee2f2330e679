use super::*;

fn iced_coffee() -> MenuItem {
    MenuItem {
        id: "64f1".to_owned(),
        name: "Iced Coffee".to_owned(),
        description: "Cold brew coffee with milk and ice".to_owned(),
        price: 4.99,
        calories: 120,
        category: Category::Drink,
        image: None,
    }
}

#[test]
fn cart_action_wire_names_are_uppercase() {
    assert_eq!(serde_json::to_value(CartAction::Add).unwrap(), serde_json::json!("ADD"));
    assert_eq!(serde_json::to_value(CartAction::Remove).unwrap(), serde_json::json!("REMOVE"));
}

#[test]
fn cart_action_from_str_is_exact() {
    assert_eq!("ADD".parse::<CartAction>(), Ok(CartAction::Add));
    assert_eq!("REMOVE".parse::<CartAction>(), Ok(CartAction::Remove));
    assert_eq!("add".parse::<CartAction>(), Err(ParseError::InvalidAction("add".into())));
    assert!("DELETE".parse::<CartAction>().is_err());
}

#[test]
fn role_and_category_strings_match_serde() {
    for role in [Role::User, Role::Ai, Role::System] {
        let json = serde_json::to_value(role).unwrap();
        assert_eq!(json, serde_json::json!(role.as_str()));
        assert_eq!(role.as_str().parse::<Role>(), Ok(role));
    }
    for category in [Category::Food, Category::Drink] {
        let json = serde_json::to_value(category).unwrap();
        assert_eq!(json, serde_json::json!(category.as_str()));
        assert_eq!(category.as_str().parse::<Category>(), Ok(category));
    }
    assert!("assistant".parse::<Role>().is_err());
    assert!("dessert".parse::<Category>().is_err());
}

#[test]
fn menu_item_defaults_optional_fields() {
    let item: MenuItem =
        serde_json::from_str(r#"{"id":"a1","name":"Tea","price":1.5,"category":"drink"}"#).unwrap();
    assert_eq!(item.description, "");
    assert_eq!(item.calories, 0);
    assert_eq!(item.category, Category::Drink);
    assert_eq!(item.image, None);
}

#[test]
fn menu_item_image_only_serialized_when_present() {
    let mut item = iced_coffee();
    assert!(serde_json::to_value(&item).unwrap().get("image").is_none());

    item.image = Some("https://images.example.test/coffee.jpg".to_owned());
    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["image"], "https://images.example.test/coffee.jpg");
}

#[test]
fn consult_response_shape() {
    let item = iced_coffee();
    let response = ConsultResponse {
        display_text: "Baik!".to_owned(),
        actions: vec![CartDirective {
            action: CartAction::Add,
            item_id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            quantity: 2,
        }],
    };
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["display_text"], "Baik!");
    assert_eq!(json["actions"][0]["action"], "ADD");
    assert_eq!(json["actions"][0]["item_id"], "64f1");
    assert_eq!(json["actions"][0]["quantity"], 2);
}

#[test]
fn consult_request_missing_prompt_is_empty() {
    let req: ConsultRequest = serde_json::from_str("{}").unwrap();
    assert!(req.prompt.is_empty());
}

#[test]
fn error_body_serializes_single_field() {
    let json = serde_json::to_string(&ErrorBody::new("Unauthorized")).unwrap();
    assert_eq!(json, r#"{"error":"Unauthorized"}"#);
}
