diesel::table! {
    tickets (id) {
        id -> Uuid,
        title -> Varchar,
        description -> Text,
        status -> Varchar,
        priority -> Varchar,
        customer_id -> Uuid,
        agent_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    user_roles (user_id) {
        user_id -> Uuid,
        role -> Varchar,
    }
}

diesel::table! {
    profiles (id) {
        id -> Uuid,
        email -> Varchar,
        full_name -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}
