//! # Seed Binary
//!
//! Populates a development database with a small but realistic outlet:
//! two tanks, two pumps, staff, a week of readings, and stock entries —
//! enough for the dashboard and the reconciliation/sales paths to show
//! non-trivial numbers.
//!
//! ## Usage
//! ```bash
//! cargo run --bin seed                      # seeds ./forecourt.db
//! DATABASE_PATH=/tmp/dev.db cargo run --bin seed
//! ```

use chrono::{Days, Utc};
use tracing::info;
use uuid::Uuid;

use forecourt_core::{NozzleReading, ProductRate, ShiftStatus, ShiftType, StockEntry};
use forecourt_db::{Database, DbConfig, DbResult};

#[tokio::main]
async fn main() -> DbResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let path = std::env::var("DATABASE_PATH").unwrap_or_else(|_| "./forecourt.db".to_string());
    info!(path = %path, "Seeding development database");

    let db = Database::new(DbConfig::new(&path)).await?;
    seed(&db).await?;

    info!("Seed complete");
    db.close().await;
    Ok(())
}

async fn seed(db: &Database) -> DbResult<()> {
    let outlets = db.outlets();

    let outlet_id = outlets.create_outlet("Highway Fuels, NH-48").await?;
    let diesel_id = outlets.create_product(&outlet_id, "Diesel").await?;
    let petrol_id = outlets.create_product(&outlet_id, "Petrol").await?;

    let manager_id = outlets
        .create_staff(&outlet_id, "Ravi", Some("9800000001"))
        .await?;
    let asha_id = outlets
        .create_staff(&outlet_id, "Asha", Some("9800000002"))
        .await?;
    let bilal_id = outlets
        .create_staff(&outlet_id, "Bilal", Some("9800000003"))
        .await?;

    let pump_a = outlets.create_dispensing_unit(&outlet_id, "Pump A").await?;
    let pump_b = outlets.create_dispensing_unit(&outlet_id, "Pump B").await?;

    // 20 kL diesel tank, 15 kL petrol tank.
    let diesel_tank = db
        .tanks()
        .create(&outlet_id, &diesel_id, "T1 - Diesel", 20_000_000, 9_000, 2_400)
        .await?;
    let petrol_tank = db
        .tanks()
        .create(&outlet_id, &petrol_id, "T2 - Petrol", 15_000_000, 7_500, 2_200)
        .await?;

    let calibration = Utc::now() + chrono::Duration::days(365);
    let n_a1 = db
        .tanks()
        .create_nozzle(&pump_a, &diesel_tank.id, 1, calibration)
        .await?;
    let n_a2 = db
        .tanks()
        .create_nozzle(&pump_a, &petrol_tank.id, 2, calibration)
        .await?;
    let n_b1 = db
        .tanks()
        .create_nozzle(&pump_b, &diesel_tank.id, 1, calibration)
        .await?;

    let today = Utc::now().date_naive();
    let week_ago = today - Days::new(7);

    // Opening stock anchored a week back.
    for (tank_id, opening_ml) in [(&diesel_tank.id, 14_000_000), (&petrol_tank.id, 9_500_000)] {
        db.stock_entries()
            .insert(&StockEntry {
                id: Uuid::new_v4().to_string(),
                tank_id: tank_id.to_string(),
                outlet_id: outlet_id.clone(),
                manager_id: manager_id.clone(),
                shift_type: ShiftType::Morning,
                shift_date: week_ago,
                opening_stock_ml: opening_ml,
                receipt_ml: 4_000_000,
                invoice_value_paise: 38_000_000,
                created_at: Utc::now(),
            })
            .await?;
    }

    // A week of morning/evening readings across both attendants.
    let mut meter_a1 = 120_000_000i64;
    let mut meter_a2 = 80_000_000i64;
    let mut meter_b1 = 95_000_000i64;

    for offset in 0..7u64 {
        let shift_date = week_ago + Days::new(offset);

        for (nozzle_id, meter, attendant, shift_type) in [
            (&n_a1.id, &mut meter_a1, &asha_id, ShiftType::Morning),
            (&n_a2.id, &mut meter_a2, &asha_id, ShiftType::Morning),
            (&n_b1.id, &mut meter_b1, &bilal_id, ShiftType::Evening),
        ] {
            let dispensed_ml = 400_000 + (offset as i64 * 25_000);
            let previous = *meter;
            *meter += dispensed_ml;

            // ~₹103.50/L book rate, split across payment methods.
            let total = dispensed_ml * 10_350 / 100_000;
            let cash = total * 6 / 10;
            let upi = total * 3 / 10;
            let card = total - cash - upi;

            db.readings()
                .insert(&NozzleReading {
                    id: Uuid::new_v4().to_string(),
                    outlet_id: outlet_id.clone(),
                    nozzle_id: nozzle_id.to_string(),
                    attendant_id: attendant.to_string(),
                    shift_type,
                    shift_date,
                    previous_reading_ml: previous,
                    current_reading_ml: *meter,
                    testing_ml: if offset == 0 { Some(5_000) } else { None },
                    cash_paise: cash,
                    credit_paise: 0,
                    upi_paise: upi,
                    card_paise: card,
                    total_paise: total,
                    created_at: Utc::now(),
                })
                .await?;
        }
    }

    // Yesterday's shift, completed; today's, active with fresh rates.
    let rates = vec![
        ProductRate {
            product_id: diesel_id.clone(),
            rate_paise: 9_230,
            density: Some(832.5),
            temperature: Some(28.0),
        },
        ProductRate {
            product_id: petrol_id.clone(),
            rate_paise: 10_350,
            density: Some(745.0),
            temperature: Some(28.0),
        },
    ];

    let yesterday = today - Days::new(1);
    let done = db
        .shifts()
        .create(&manager_id, ShiftType::Morning, yesterday, &rates)
        .await?;
    db.shifts().transition(&done.id, ShiftStatus::Active).await?;
    db.shifts().transition(&done.id, ShiftStatus::Completed).await?;
    db.shifts().transition(&done.id, ShiftStatus::Submitted).await?;

    let current = db
        .shifts()
        .create(&manager_id, ShiftType::Morning, today, &rates)
        .await?;
    db.shifts()
        .transition(&current.id, ShiftStatus::Active)
        .await?;

    info!(
        outlet_id = %outlet_id,
        diesel_tank = %diesel_tank.id,
        petrol_tank = %petrol_tank.id,
        "Seeded outlet"
    );

    Ok(())
}
