pub mod partner_controller;
