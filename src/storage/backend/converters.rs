use crate::storage::models::{Origin, OriginGroup, QuerystringParameter, Registration};
use migration::entities::{origin, origin_group, querystring_parameter, registration};

/// Convert a Sea-ORM model into an Origin
pub fn model_to_origin(model: origin::Model) -> Origin {
    Origin {
        code: model.code,
        title: model.title,
        description: model.description,
        track_registrations: model.track_registrations,
        querystring_parameters: model.querystring_parameters,
        redirect_to: model.redirect_to,
        number_of_registrations: model.number_of_registrations,
        origin_group_id: model.origin_group_id,
        created_at: model.created_at,
    }
}

/// Convert an Origin into an ActiveModel for insert or update.
///
/// On update the counter and creation timestamp stay NotSet: the counter is
/// owned by the registration recorder and `created_at` is immutable.
pub fn origin_to_active_model(origin: &Origin, is_new: bool) -> origin::ActiveModel {
    use sea_orm::ActiveValue::*;

    origin::ActiveModel {
        code: Set(origin.code.clone()),
        title: Set(origin.title.clone()),
        description: Set(origin.description.clone()),
        track_registrations: Set(origin.track_registrations),
        querystring_parameters: Set(origin.querystring_parameters.clone()),
        redirect_to: Set(origin.redirect_to.clone()),
        number_of_registrations: if is_new {
            Set(origin.number_of_registrations)
        } else {
            NotSet
        },
        origin_group_id: Set(origin.origin_group_id),
        created_at: if is_new { Set(origin.created_at) } else { NotSet },
    }
}

pub fn model_to_registration(model: registration::Model) -> Registration {
    Registration {
        id: model.id,
        user_id: model.user_id,
        origin_code: model.origin_code,
        created: model.created,
    }
}

pub fn model_to_parameter(model: querystring_parameter::Model) -> QuerystringParameter {
    QuerystringParameter {
        id: model.id,
        identifier: model.identifier,
        value: model.value,
        origin_code: model.origin_code,
        number_of_registrations: model.number_of_registrations,
    }
}

pub fn model_to_group(model: origin_group::Model) -> OriginGroup {
    OriginGroup {
        id: model.id,
        title: model.title,
        description: model.description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::ActiveValue;

    fn create_test_model() -> origin::Model {
        origin::Model {
            code: "abc1234".to_string(),
            title: "Spring campaign".to_string(),
            description: Some("Landing page A".to_string()),
            track_registrations: true,
            querystring_parameters: Some("pid\noid".to_string()),
            redirect_to: Some("https://example.com/landing".to_string()),
            number_of_registrations: 42,
            origin_group_id: Some(3),
            created_at: Utc::now(),
        }
    }

    fn create_test_origin() -> Origin {
        Origin {
            code: "def5678".to_string(),
            title: "Autumn campaign".to_string(),
            description: None,
            track_registrations: false,
            querystring_parameters: None,
            redirect_to: None,
            number_of_registrations: 7,
            origin_group_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_model_to_origin_basic() {
        let model = create_test_model();
        let expected_code = model.code.clone();
        let expected_title = model.title.clone();

        let origin = model_to_origin(model);

        assert_eq!(origin.code, expected_code);
        assert_eq!(origin.title, expected_title);
        assert_eq!(origin.number_of_registrations, 42);
        assert_eq!(origin.origin_group_id, Some(3));
    }

    #[test]
    fn test_model_to_origin_with_none_fields() {
        let model = origin::Model {
            code: "test123".to_string(),
            title: "Test".to_string(),
            description: None,
            track_registrations: true,
            querystring_parameters: None,
            redirect_to: None,
            number_of_registrations: 0,
            origin_group_id: None,
            created_at: Utc::now(),
        };

        let origin = model_to_origin(model);

        assert!(origin.description.is_none());
        assert!(origin.redirect_to.is_none());
        assert!(origin.parameter_list().is_empty());
    }

    #[test]
    fn test_origin_to_active_model_new() {
        let origin = create_test_origin();
        let active_model = origin_to_active_model(&origin, true);

        // A fresh insert sets every column
        assert!(matches!(active_model.code, ActiveValue::Set(_)));
        assert!(matches!(active_model.title, ActiveValue::Set(_)));
        assert!(matches!(active_model.created_at, ActiveValue::Set(_)));
        assert!(matches!(
            active_model.number_of_registrations,
            ActiveValue::Set(_)
        ));

        if let ActiveValue::Set(code) = active_model.code {
            assert_eq!(code, origin.code);
        }
        if let ActiveValue::Set(count) = active_model.number_of_registrations {
            assert_eq!(count, 7);
        }
    }

    #[test]
    fn test_origin_to_active_model_update() {
        let origin = create_test_origin();
        let active_model = origin_to_active_model(&origin, false);

        // Updates never touch the counter or the creation timestamp
        assert!(matches!(active_model.code, ActiveValue::Set(_)));
        assert!(matches!(active_model.title, ActiveValue::Set(_)));
        assert!(matches!(active_model.created_at, ActiveValue::NotSet));
        assert!(matches!(
            active_model.number_of_registrations,
            ActiveValue::NotSet
        ));
    }

    #[test]
    fn test_model_to_registration() {
        let created = Utc::now();
        let model = registration::Model {
            id: 11,
            user_id: "user-42".to_string(),
            origin_code: "abc1234".to_string(),
            created,
        };

        let registration = model_to_registration(model);

        assert_eq!(registration.id, 11);
        assert_eq!(registration.user_id, "user-42");
        assert_eq!(registration.origin_code, "abc1234");
        assert_eq!(registration.created, created);
    }

    #[test]
    fn test_model_to_parameter() {
        let model = querystring_parameter::Model {
            id: 5,
            identifier: "pid".to_string(),
            value: "7".to_string(),
            origin_code: "abc1234".to_string(),
            number_of_registrations: 3,
        };

        let parameter = model_to_parameter(model);

        assert_eq!(parameter.identifier, "pid");
        assert_eq!(parameter.value, "7");
        assert_eq!(parameter.number_of_registrations, 3);
    }
}
