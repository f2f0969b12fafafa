pub mod payment_event_controller;
