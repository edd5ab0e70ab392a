use std::error::Error;

use dealership::{
    auth::jwt::UserRole,
    configuration::{DatabaseSettings, Settings},
    db_interaction::insert_user_into_database,
    models::{Vehicle, VehicleStatus, VehicleType},
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
    utils::DealershipPool
};
use diesel::{pg::Pg, r2d2::ConnectionManager, Connection, PgConnection, RunQueryDsl};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use once_cell::sync::Lazy;
use r2d2::Pool;
use reqwest::redirect::Policy;
use secrecy::SecretString;
use serde::Deserialize;
use uuid::Uuid;
use wiremock::{matchers::{method, path}, Mock, MockServer, ResponseTemplate};

static LOGGER_INSTANCE: Lazy<()> = Lazy::new(|| {
    let log_level = "info".to_string();
    let name = "dealership-test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(name, log_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(name, log_level, std::io::sink);
        init_subscriber(subscriber);
    }

    ()
});

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

fn run_migrations(connection: &mut impl MigrationHarness<Pg>)
    -> Result<(), Box<dyn Error + Send + Sync + 'static>>
{
    connection.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

#[derive(Deserialize)]
pub struct LoginResponse{
    pub token: String
}

pub struct TestApp{
    pub host: String,
    pub port: u16,
    pub pool: DealershipPool,
    pub payment_api: MockServer,
    pub api_client: reqwest::Client
}

impl TestApp {
    fn create_db(settings: &DatabaseSettings) -> DealershipPool{
        let mut connection = PgConnection::establish(&settings.get_database_url())
                                .expect("Failed to connect to postgres database");

        let query = format!(r#"CREATE DATABASE "{}";"#, settings.name);
        diesel::sql_query(query)
            .execute(&mut connection)
            .expect("Failed to create test database");

        let pool = Pool::new(ConnectionManager::<PgConnection>::new(settings.get_database_table_url()))
            .expect("Failed to build connection pool to test database");

        let mut conn = pool.get().expect("Failed to get connection to test database");
        run_migrations(&mut conn).expect("Failed to run migrations");

        pool
    }

    pub fn get_app_url(&self) -> String{
        format!("http://{}:{}", self.host, self.port)
    }

    pub async fn spawn_app() -> TestApp{
        Lazy::force(&LOGGER_INSTANCE);

        let payment_api = MockServer::start().await;

        let mut settings = Settings::get();
        settings.application.port = 0;
        settings.database.name = Uuid::new_v4().to_string();
        settings.payment.api_uri = payment_api.uri();

        let pool = TestApp::create_db(&settings.database);

        let application = Application::new(settings)
                            .await
                            .expect("Failed to build application");

        tokio::task::spawn(application.server);

        let api_client = reqwest::Client::builder()
                            .redirect(Policy::none())
                            .build()
                            .unwrap();

        return TestApp{
            host: application.host,
            port: application.port,
            pool,
            payment_api,
            api_client
        }
    }

    // Accounts with elevated roles are provisioned out of band in
    // production, so tests write them straight into the database
    pub async fn create_user(&self, email: &str, password: &str, role: UserRole) -> Uuid{
        let conn = self.pool.get().expect("Failed to get connection to test database");

        insert_user_into_database(
            conn,
            "Test User".to_string(),
            email.to_string(),
            SecretString::from(password.to_string()),
            role
        )
        .await
        .expect("Failed to insert test user")
    }

    pub async fn login(&self, email: &str, password: &str) -> String{
        let body = serde_json::json!({
            "email": email,
            "password": password
        });

        let response: LoginResponse = self.api_client
            .post(format!("{}/login", self.get_app_url()))
            .form(&body)
            .send()
            .await
            .expect("Failed to send request to login endpoint")
            .json()
            .await
            .expect("Failed to deserialize login response");

        response.token
    }

    pub async fn create_user_and_login(&self, email: &str, role: UserRole) -> (Uuid, String){
        let user_id = self.create_user(email, "testpassword", role).await;
        let token = self.login(email, "testpassword").await;

        (user_id, token)
    }

    pub fn seed_vehicle_type(&self) -> Uuid{
        use dealership::schema::vehicle_types;

        let vehicle_type = VehicleType{
            vehicle_type_id: Uuid::new_v4(),
            name: format!("SUV {}", Uuid::new_v4()),
            description: None
        };

        let mut conn = self.pool.get().expect("Failed to get connection to test database");
        diesel::insert_into(vehicle_types::table)
            .values(&vehicle_type)
            .execute(&mut conn)
            .expect("Failed to insert test vehicle type");

        vehicle_type.vehicle_type_id
    }

    pub fn seed_vehicle(&self, price: i64, status: VehicleStatus) -> Uuid{
        use dealership::schema::vehicles;

        let vehicle = Vehicle{
            vehicle_id: Uuid::new_v4(),
            name: "VinFast VF 8".to_string(),
            price,
            color: Some("Đen".to_string()),
            engine: Some("Electric".to_string()),
            status: status.as_str().to_string(),
            images: "front.jpg|side.jpg".to_string(),
            production_year: Some(2024),
            vehicle_type_id: self.seed_vehicle_type(),
            supplier_id: None
        };

        let mut conn = self.pool.get().expect("Failed to get connection to test database");
        diesel::insert_into(vehicles::table)
            .values(&vehicle)
            .execute(&mut conn)
            .expect("Failed to insert test vehicle");

        vehicle.vehicle_id
    }

    pub fn get_vehicle_status(&self, vehicle_id: Uuid) -> String{
        use dealership::schema::vehicles;
        use diesel::{ExpressionMethods, QueryDsl};

        let mut conn = self.pool.get().expect("Failed to get connection to test database");
        vehicles::table
            .filter(vehicles::vehicle_id.eq(vehicle_id))
            .select(vehicles::status)
            .first(&mut conn)
            .expect("Failed to load test vehicle status")
    }

    // Stands in for the gateway during checkout tests
    pub async fn mount_payment_mock(&self, expected_calls: u64){
        Mock::given(method("POST"))
            .and(path("/v1/payment_intents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "pi_test_intent",
                "client_secret": "pi_test_intent_secret_abc123"
            })))
            .expect(expected_calls)
            .mount(&self.payment_api)
            .await;
    }
}
