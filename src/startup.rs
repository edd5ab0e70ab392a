use std::net::TcpListener;

use actix_web::{dev::Server, web, App, HttpServer};
use diesel::{r2d2::ConnectionManager, PgConnection};
use r2d2::Pool;
use tracing_actix_web::TracingLogger;

use crate::auth::jwt::Tokenizer;
use crate::configuration::Settings;
use crate::payment_client::PaymentClient;
use crate::push::NotificationChannels;
use crate::routes::{
    appointments, authentication, deposit, health_check, notifications, profile, reviews,
    suppliers, vehicle_types, vehicles,
};
use crate::utils::DealershipPool;

pub struct Application{
    pub host: String,
    pub port: u16,
    pub server: Server
}

impl Application {
    pub async fn new(settings: Settings) -> Result<Self, anyhow::Error>{
        let listener = TcpListener::bind((
            settings.application.host.as_str(),
            settings.application.port
        ))?;
        let port = listener.local_addr()?.port();
        let host = settings.application.host.clone();

        let pool: DealershipPool = Pool::builder()
            .build(ConnectionManager::<PgConnection>::new(
                settings.database.get_database_table_url()
            ))?;

        let tokenizer = Tokenizer::new(&settings.jwt);
        let payment_client = PaymentClient::new(
            settings.payment.api_uri.clone(),
            settings.payment.secret_key.clone(),
            settings.payment.timeout_seconds
        );

        let pool = web::Data::new(pool);
        let tokenizer = web::Data::new(tokenizer);
        let payment_client = web::Data::new(payment_client);
        let channels = web::Data::new(NotificationChannels::new());

        let server = HttpServer::new(move || {
            App::new()
                .wrap(TracingLogger::default())
                .route("/health", web::get().to(health_check))
                .route("/register", web::post().to(authentication::register))
                .route("/login", web::post().to(authentication::login))
                .route("/vehicles", web::get().to(vehicles::get_vehicles_route))
                .route("/vehicle_types", web::get().to(vehicle_types::get_vehicle_types_route))
                .route("/suppliers", web::get().to(suppliers::get_suppliers_route))
                .route("/reviews", web::get().to(reviews::get_reviews))
                .route("/admin/vehicles", web::post().to(vehicles::post_vehicle))
                .route("/admin/vehicles", web::put().to(vehicles::update_vehicle_route))
                .route("/admin/vehicles", web::delete().to(vehicles::delete_vehicle_route))
                .route("/admin/vehicle_types", web::post().to(vehicle_types::post_vehicle_type))
                .route("/admin/vehicle_types", web::delete().to(vehicle_types::delete_vehicle_type_route))
                .route("/admin/suppliers", web::post().to(suppliers::post_supplier))
                .route("/admin/suppliers", web::delete().to(suppliers::delete_supplier_route))
                .route("/user/profile", web::get().to(profile::get_profile))
                .route("/user/profile", web::post().to(profile::post_profile))
                .route("/user/deposit/intent", web::post().to(deposit::post_deposit_intent))
                .route("/user/deposit", web::post().to(deposit::post_deposit))
                .route("/user/deposit", web::get().to(deposit::get_deposit))
                .route("/user/deposit", web::delete().to(deposit::delete_deposit))
                .route("/staff/deposit", web::put().to(deposit::update_deposit))
                .route("/user/appointment", web::post().to(appointments::post_appointment))
                .route("/user/appointment", web::put().to(appointments::update_appointment))
                .route("/user/appointment", web::get().to(appointments::get_appointments))
                .route("/user/notifications", web::get().to(notifications::get_notifications_route))
                .route("/user/notifications/read", web::post().to(notifications::read_notification))
                .route("/user/notifications", web::delete().to(notifications::delete_notification_route))
                .route("/user/notifications/stream", web::get().to(notifications::stream_notifications))
                .route("/user/review", web::post().to(reviews::post_review))
                .route("/user/review", web::delete().to(reviews::delete_review_route))
                .app_data(pool.clone())
                .app_data(tokenizer.clone())
                .app_data(payment_client.clone())
                .app_data(channels.clone())
        })
        .listen(listener)?
        .run();

        Ok(Application{ host, port, server })
    }
}
