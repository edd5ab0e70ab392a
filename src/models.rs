use chrono::{DateTime, Utc};
use diesel::prelude::{Insertable, Queryable};
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::schema::{deposit_items, deposits, notifications, pickup_appointments, reviews, suppliers, users, vehicle_types, vehicles};

// Vehicle availability vocabulary; the literal strings are what the store
// and the storefront display, so they are kept verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleStatus{
    Available,
    Deposited,
    SoldOut
}

impl VehicleStatus{
    pub fn as_str(&self) -> &'static str{
        match self {
            VehicleStatus::Available => "Còn Hàng",
            VehicleStatus::Deposited => "Đã Đặt Cọc",
            VehicleStatus::SoldOut => "Hết Hàng"
        }
    }

    pub fn parse(s: &str) -> Option<VehicleStatus>{
        match s {
            "Còn Hàng" => Some(VehicleStatus::Available),
            "Đã Đặt Cọc" => Some(VehicleStatus::Deposited),
            "Hết Hàng" => Some(VehicleStatus::SoldOut),
            _ => None
        }
    }
}

#[derive(Queryable, Insertable, Clone)]
#[diesel(table_name = users)]
pub struct User{
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub phone_number: Option<String>,
    pub address: Option<String>
}

#[derive(Queryable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = users)]
pub struct UserProfileInfo{
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub address: Option<String>
}

#[derive(Queryable, Insertable, Serialize, Deserialize, Clone)]
#[diesel(table_name = suppliers)]
pub struct Supplier{
    pub supplier_id: Uuid,
    pub name: String,
    pub contact_email: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>
}

#[derive(Queryable, Insertable, Serialize, Deserialize, Clone)]
#[diesel(table_name = vehicle_types)]
pub struct VehicleType{
    pub vehicle_type_id: Uuid,
    pub name: String,
    pub description: Option<String>
}

#[derive(Queryable, Insertable, Clone)]
#[diesel(table_name = vehicles)]
pub struct Vehicle{
    pub vehicle_id: Uuid,
    pub name: String,
    pub price: i64,
    pub color: Option<String>,
    pub engine: Option<String>,
    pub status: String,
    pub images: String,
    pub production_year: Option<i32>,
    pub vehicle_type_id: Uuid,
    pub supplier_id: Option<Uuid>
}

impl Vehicle{
    // Images travel as a single '|'-joined column
    pub fn split_images(&self) -> Vec<String>{
        self.images
            .split('|')
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect()
    }

    pub fn join_images(images: &[String]) -> String{
        images.join("|")
    }
}

#[derive(Queryable, Insertable, Clone)]
#[diesel(table_name = deposits)]
pub struct Deposit{
    pub deposit_id: Uuid,
    pub vehicle_id: Uuid,
    pub user_id: Uuid,
    pub deposit_date: DateTime<Utc>,
    pub amount: i64,
    pub status: String
}

#[derive(Queryable, Insertable, Clone)]
#[diesel(table_name = deposit_items)]
pub struct DepositItem{
    pub deposit_item_id: Uuid,
    pub deposit_id: Option<Uuid>,
    pub vehicle_id: Uuid,
    pub quantity: i32,
    pub unit_price: i64
}

#[derive(Queryable, Insertable, Serialize, Clone)]
#[diesel(table_name = pickup_appointments)]
pub struct PickupAppointment{
    pub appointment_id: Uuid,
    pub deposit_id: Option<Uuid>,
    pub scheduled_at: DateTime<Utc>,
    pub location: String
}

#[derive(Queryable, Insertable, Serialize, Clone)]
#[diesel(table_name = notifications)]
pub struct Notification{
    pub notification_id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>
}

#[derive(Queryable, Insertable, Serialize, Clone)]
#[diesel(table_name = reviews)]
pub struct Review{
    pub review_id: Uuid,
    pub vehicle_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>
}
