// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

// Diesel table definitions. Kept in step with both migration directories.

diesel::table! {
    operators (operator_id) {
        operator_id -> BigInt,
        login_name -> Text,
        display_name -> Text,
        password_hash -> Text,
        role -> Text,
        is_disabled -> Integer,
        created_at -> Text,
        disabled_at -> Nullable<Text>,
        last_login_at -> Nullable<Text>,
    }
}

diesel::table! {
    sessions (session_id) {
        session_id -> BigInt,
        session_token -> Text,
        operator_id -> BigInt,
        created_at -> Text,
        last_activity_at -> Text,
        expires_at -> Text,
    }
}

diesel::table! {
    clients (client_id) {
        client_id -> BigInt,
        name -> Text,
        company -> Nullable<Text>,
        phone -> Text,
        email -> Nullable<Text>,
        address -> Nullable<Text>,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    vehicles (vehicle_id) {
        vehicle_id -> BigInt,
        plate_number -> Text,
        make -> Text,
        model -> Text,
        capacity -> Nullable<Text>,
        status -> Text,
        created_at -> Text,
    }
}

diesel::table! {
    drivers (driver_id) {
        driver_id -> BigInt,
        full_name -> Text,
        phone -> Text,
        license_number -> Text,
        vehicle_id -> Nullable<BigInt>,
        operator_id -> Nullable<BigInt>,
        is_active -> Integer,
        created_at -> Text,
    }
}

diesel::table! {
    bookings (booking_id) {
        booking_id -> BigInt,
        job_id -> Text,
        client_id -> BigInt,
        pickup_address -> Text,
        dropoff_address -> Text,
        route -> Nullable<Text>,
        cargo_description -> Text,
        pickup_date -> Text,
        budget_kobo -> BigInt,
        agreed_amount_kobo -> Nullable<BigInt>,
        status -> Text,
        driver_id -> Nullable<BigInt>,
        vehicle_id -> Nullable<BigInt>,
        fuel_kobo -> BigInt,
        ticketing_kobo -> BigInt,
        allowance_kobo -> BigInt,
        payment_status -> Text,
        cancellation_reason -> Nullable<Text>,
        notes -> Nullable<Text>,
        created_by -> Nullable<BigInt>,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    job_id_sequences (sequence_date) {
        sequence_date -> Text,
        last_sequence -> Integer,
    }
}

diesel::table! {
    job_timeline (event_id) {
        event_id -> BigInt,
        booking_id -> Nullable<BigInt>,
        job_id -> Nullable<Text>,
        actor_operator_id -> BigInt,
        actor_login_name -> Text,
        actor_display_name -> Text,
        actor_json -> Text,
        cause_json -> Text,
        action_name -> Text,
        action_json -> Text,
        before_snapshot_json -> Text,
        after_snapshot_json -> Text,
        created_at -> Text,
    }
}

diesel::table! {
    waybill_uploads (waybill_id) {
        waybill_id -> BigInt,
        booking_id -> BigInt,
        file_url -> Text,
        file_name -> Text,
        uploaded_by -> Nullable<BigInt>,
        uploaded_at -> Text,
    }
}

diesel::table! {
    incidents (incident_id) {
        incident_id -> BigInt,
        booking_id -> BigInt,
        description -> Text,
        severity -> Text,
        reported_by -> Nullable<BigInt>,
        reported_at -> Text,
    }
}

diesel::table! {
    negotiation_threads (negotiation_id) {
        negotiation_id -> BigInt,
        booking_id -> BigInt,
        proposed_kobo -> BigInt,
        message -> Nullable<Text>,
        author_operator_id -> Nullable<BigInt>,
        created_at -> Text,
    }
}

diesel::table! {
    prepaid_accounts (account_id) {
        account_id -> BigInt,
        name -> Text,
        category -> Text,
        balance_kobo -> BigInt,
        created_at -> Text,
    }
}

diesel::table! {
    account_topups (topup_id) {
        topup_id -> BigInt,
        account_id -> BigInt,
        amount_kobo -> BigInt,
        reference -> Nullable<Text>,
        note -> Nullable<Text>,
        is_refund -> Integer,
        source_job_id -> Nullable<Text>,
        created_by -> Nullable<BigInt>,
        created_at -> Text,
    }
}

diesel::table! {
    expense_transactions (transaction_id) {
        transaction_id -> BigInt,
        account_id -> BigInt,
        booking_id -> Nullable<BigInt>,
        category -> Text,
        amount_kobo -> BigInt,
        description -> Text,
        receipt_url -> Nullable<Text>,
        created_by -> Nullable<BigInt>,
        created_at -> Text,
    }
}

diesel::table! {
    maintenance_logs (log_id) {
        log_id -> BigInt,
        vehicle_id -> BigInt,
        service_type -> Text,
        description -> Nullable<Text>,
        cost_kobo -> BigInt,
        service_date -> Text,
        status -> Text,
        workshop -> Nullable<Text>,
        created_by -> Nullable<BigInt>,
        created_at -> Text,
        completed_at -> Nullable<Text>,
    }
}

diesel::table! {
    maintenance_schedules (schedule_id) {
        schedule_id -> BigInt,
        vehicle_id -> BigInt,
        service_type -> Text,
        interval_days -> Integer,
        last_service_date -> Text,
        next_due_date -> Text,
        is_active -> Integer,
        created_at -> Text,
    }
}

diesel::table! {
    procurements (procurement_id) {
        procurement_id -> BigInt,
        title -> Text,
        vehicle_type -> Text,
        quantity -> Integer,
        estimated_cost_kobo -> BigInt,
        supplier -> Nullable<Text>,
        justification -> Nullable<Text>,
        photo_url -> Nullable<Text>,
        status -> Text,
        requested_by -> Nullable<BigInt>,
        decided_by -> Nullable<BigInt>,
        decision_note -> Nullable<Text>,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    deletion_log (deletion_id) {
        deletion_id -> BigInt,
        booking_id -> BigInt,
        job_id -> Text,
        deleted_by -> Nullable<BigInt>,
        reason -> Nullable<Text>,
        booking_snapshot_json -> Text,
        refunds_json -> Text,
        deleted_at -> Text,
    }
}

diesel::table! {
    workdrive_folders (folder_id) {
        folder_id -> BigInt,
        parent_id -> Nullable<BigInt>,
        name -> Text,
        created_by -> Nullable<BigInt>,
        created_at -> Text,
    }
}

diesel::table! {
    workdrive_documents (document_id) {
        document_id -> BigInt,
        folder_id -> Nullable<BigInt>,
        name -> Text,
        file_url -> Text,
        mime_type -> Nullable<Text>,
        size_bytes -> Nullable<BigInt>,
        uploaded_by -> Nullable<BigInt>,
        created_at -> Text,
    }
}

diesel::joinable!(sessions -> operators (operator_id));
diesel::joinable!(drivers -> vehicles (vehicle_id));
diesel::joinable!(bookings -> clients (client_id));
diesel::joinable!(job_timeline -> bookings (booking_id));
diesel::joinable!(waybill_uploads -> bookings (booking_id));
diesel::joinable!(incidents -> bookings (booking_id));
diesel::joinable!(negotiation_threads -> bookings (booking_id));
diesel::joinable!(account_topups -> prepaid_accounts (account_id));
diesel::joinable!(expense_transactions -> prepaid_accounts (account_id));
diesel::joinable!(maintenance_logs -> vehicles (vehicle_id));
diesel::joinable!(maintenance_schedules -> vehicles (vehicle_id));
diesel::joinable!(workdrive_documents -> workdrive_folders (folder_id));

diesel::allow_tables_to_appear_in_same_query!(
    operators,
    sessions,
    clients,
    vehicles,
    drivers,
    bookings,
    job_id_sequences,
    job_timeline,
    waybill_uploads,
    incidents,
    negotiation_threads,
    prepaid_accounts,
    account_topups,
    expense_transactions,
    maintenance_logs,
    maintenance_schedules,
    procurements,
    deletion_log,
    workdrive_folders,
    workdrive_documents,
);
