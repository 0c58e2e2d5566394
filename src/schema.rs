diesel::table! {
    payments (id) {
        id -> Integer,
        name -> Text,
        matric_number -> BigInt,
        amount -> Integer,
        reason -> Nullable<Text>,
        receipt -> Text,
        confirmed -> Bool,
        timestamp -> Timestamp,
    }
}
