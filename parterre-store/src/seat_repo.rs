use chrono::Utc;
use parterre_domain::{Seat, SeatStatus, Tier};
use sqlx::{PgPool, Postgres};

/// Raw row shape of the `seats` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SeatRow {
    pub seat_id: String,
    pub seat_row: String,
    pub seat_number: i32,
    pub tier: String,
    pub price: i32,
    pub status: String,
    pub user_id: Option<String>,
}

impl SeatRow {
    /// Rows with unknown tier/status strings are treated as data corruption
    /// and dropped by callers.
    pub fn into_seat(self) -> Option<Seat> {
        let tier = Tier::parse(&self.tier)?;
        let status = match self.status.as_str() {
            "available" => SeatStatus::Available,
            "booked" => SeatStatus::Booked,
            _ => return None,
        };
        Some(Seat {
            seat_id: self.seat_id,
            row: self.seat_row,
            number: self.seat_number,
            tier,
            price: self.price,
            status,
            user_id: self.user_id,
        })
    }
}

pub struct SeatRepository;

impl SeatRepository {
    pub async fn list_all(pool: &PgPool) -> Result<Vec<SeatRow>, sqlx::Error> {
        sqlx::query_as::<_, SeatRow>(
            r#"
            SELECT seat_id, seat_row, seat_number, tier, price, status, user_id
            FROM seats
            ORDER BY seat_row, seat_number
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Row-locked read inside the purchase transaction; serializes
    /// per-seat updates against concurrent purchasers.
    pub async fn find_for_update(
        tx: &mut sqlx::Transaction<'_, Postgres>,
        seat_id: &str,
    ) -> Result<Option<SeatRow>, sqlx::Error> {
        sqlx::query_as::<_, SeatRow>(
            r#"
            SELECT seat_id, seat_row, seat_number, tier, price, status, user_id
            FROM seats
            WHERE seat_id = $1
            FOR UPDATE
            "#,
        )
        .bind(seat_id)
        .fetch_optional(&mut **tx)
        .await
    }

    pub async fn mark_booked(
        tx: &mut sqlx::Transaction<'_, Postgres>,
        seat_id: &str,
        user_id: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE seats
            SET status = 'booked', user_id = $2, booked_at = $3
            WHERE seat_id = $1
            "#,
        )
        .bind(seat_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    pub async fn reset_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE seats
            SET status = 'available', user_id = NULL, booked_at = NULL
            "#,
        )
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Idempotent boot seeding; existing seats are left untouched.
    pub async fn seed(pool: &PgPool, seats: &[Seat]) -> Result<u64, sqlx::Error> {
        let mut inserted = 0;
        for seat in seats {
            let result = sqlx::query(
                r#"
                INSERT INTO seats (seat_id, seat_row, seat_number, tier, price, status)
                VALUES ($1, $2, $3, $4, $5, 'available')
                ON CONFLICT (seat_id) DO NOTHING
                "#,
            )
            .bind(&seat.seat_id)
            .bind(&seat.row)
            .bind(seat.number)
            .bind(seat.tier.as_str())
            .bind(seat.price)
            .execute(pool)
            .await?;
            inserted += result.rows_affected();
        }
        Ok(inserted)
    }
}
