use anyhow::{bail, Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection};

use crate::db::{parse_datetime, to_i64, to_u32, Database};
use crate::models::{ReferencePoint, WifiReading};

impl Database {
    /// First-phase write: the point becomes visible (normally with an empty
    /// reading set) while scanning is still running. Fails if the id exists.
    pub async fn insert_reference_point(&self, point: &ReferencePoint) -> Result<()> {
        let record = point.clone();
        self.execute(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO reference_points (id, name, x, y, image_id, scan_count, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    record.id,
                    record.name,
                    record.x,
                    record.y,
                    record.image_id,
                    to_i64(u64::from(record.scan_count))?,
                    record.created_at.to_rfc3339(),
                    record.updated_at.to_rfc3339(),
                ],
            )
            .with_context(|| "failed to insert reference point")?;

            insert_readings(&tx, &record.id, &record.wifi_readings)?;
            tx.commit().context("failed to commit reference point insert")?;
            Ok(())
        })
        .await
    }

    /// Second-phase write: updates the row created by
    /// [`insert_reference_point`] in place, keyed by the pre-allocated id,
    /// and replaces the stored reading set with the point's current one.
    /// Never produces a second record for the same id.
    pub async fn upsert_reference_point(&self, point: &ReferencePoint) -> Result<()> {
        let record = point.clone();
        self.execute(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO reference_points (id, name, x, y, image_id, scan_count, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 ON CONFLICT(id) DO UPDATE SET
                     name = excluded.name,
                     x = excluded.x,
                     y = excluded.y,
                     image_id = excluded.image_id,
                     scan_count = excluded.scan_count,
                     updated_at = excluded.updated_at",
                params![
                    record.id,
                    record.name,
                    record.x,
                    record.y,
                    record.image_id,
                    to_i64(u64::from(record.scan_count))?,
                    record.created_at.to_rfc3339(),
                    record.updated_at.to_rfc3339(),
                ],
            )
            .with_context(|| "failed to upsert reference point")?;

            tx.execute(
                "DELETE FROM wifi_readings WHERE reference_point_id = ?1",
                params![record.id],
            )
            .with_context(|| "failed to clear prior readings")?;

            insert_readings(&tx, &record.id, &record.wifi_readings)?;
            tx.commit().context("failed to commit reference point upsert")?;
            Ok(())
        })
        .await
    }

    /// Append-policy write: prior readings stay untouched and in order, the
    /// new batch lands after them, and `scan_count` grows by the number of
    /// newly completed attempts. Atomic per point.
    pub async fn append_wifi_readings(
        &self,
        point_id: &str,
        readings: Vec<WifiReading>,
        completed_attempts: u32,
    ) -> Result<()> {
        let point_id = point_id.to_string();
        self.execute(move |conn| {
            let tx = conn.transaction()?;

            let exists: bool = tx
                .query_row(
                    "SELECT EXISTS(SELECT 1 FROM reference_points WHERE id = ?1)",
                    params![point_id],
                    |row| row.get(0),
                )
                .with_context(|| "failed to check reference point existence")?;
            if !exists {
                bail!("no reference point with id {point_id}");
            }

            insert_readings(&tx, &point_id, &readings)?;

            tx.execute(
                "UPDATE reference_points
                 SET scan_count = scan_count + ?1,
                     updated_at = ?2
                 WHERE id = ?3",
                params![
                    to_i64(u64::from(completed_attempts))?,
                    Utc::now().to_rfc3339(),
                    point_id,
                ],
            )
            .with_context(|| "failed to bump scan count")?;

            tx.commit().context("failed to commit reading append")?;
            Ok(())
        })
        .await
    }

    pub async fn get_reference_point(&self, id: &str) -> Result<Option<ReferencePoint>> {
        let id = id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, x, y, image_id, scan_count, created_at, updated_at
                 FROM reference_points
                 WHERE id = ?1",
            )?;

            let mut rows = stmt.query(params![id])?;
            let Some(row) = rows.next()? else {
                return Ok(None);
            };

            let mut point = point_from_row(row)?;
            point.wifi_readings = readings_for_point(conn, &point.id)?;
            Ok(Some(point))
        })
        .await
    }

    pub async fn list_reference_points(&self) -> Result<Vec<ReferencePoint>> {
        self.execute(|conn| {
            let mut points = Vec::new();
            {
                let mut stmt = conn.prepare(
                    "SELECT id, name, x, y, image_id, scan_count, created_at, updated_at
                     FROM reference_points
                     ORDER BY created_at ASC",
                )?;

                let mut rows = stmt.query([])?;
                while let Some(row) = rows.next()? {
                    points.push(point_from_row(row)?);
                }
            }

            for point in &mut points {
                point.wifi_readings = readings_for_point(conn, &point.id)?;
            }

            Ok(points)
        })
        .await
    }

    /// Removes the point and, via the cascade, exactly its readings.
    pub async fn delete_reference_point(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.execute(move |conn| {
            conn.execute("DELETE FROM reference_points WHERE id = ?1", params![id])
                .with_context(|| "failed to delete reference point")?;
            Ok(())
        })
        .await
    }
}

fn insert_readings(
    conn: &Connection,
    point_id: &str,
    readings: &[WifiReading],
) -> Result<()> {
    let mut stmt = conn
        .prepare(
            "INSERT INTO wifi_readings (reference_point_id, bssid, ssid, level, frequency, batch_id, scan_time)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .context("failed to prepare reading insert")?;

    for reading in readings {
        stmt.execute(params![
            point_id,
            reading.bssid,
            reading.ssid,
            reading.level,
            reading.frequency,
            reading.batch_id,
            reading.scan_time.to_rfc3339(),
        ])
        .with_context(|| "failed to insert wifi reading")?;
    }

    Ok(())
}

fn point_from_row(row: &rusqlite::Row<'_>) -> Result<ReferencePoint> {
    Ok(ReferencePoint {
        id: row.get::<_, String>(0)?,
        name: row.get::<_, String>(1)?,
        x: row.get::<_, f64>(2)?,
        y: row.get::<_, f64>(3)?,
        image_id: row.get::<_, String>(4)?,
        scan_count: to_u32(row.get::<_, i64>(5)?, "scan_count")?,
        wifi_readings: Vec::new(),
        created_at: parse_datetime(&row.get::<_, String>(6)?, "created_at")?,
        updated_at: parse_datetime(&row.get::<_, String>(7)?, "updated_at")?,
    })
}

fn readings_for_point(conn: &Connection, point_id: &str) -> Result<Vec<WifiReading>> {
    let mut stmt = conn.prepare(
        "SELECT id, bssid, ssid, level, frequency, batch_id, scan_time
         FROM wifi_readings
         WHERE reference_point_id = ?1
         ORDER BY id ASC",
    )?;

    let mut rows = stmt.query(params![point_id])?;
    let mut readings = Vec::new();
    while let Some(row) = rows.next()? {
        readings.push(WifiReading {
            id: Some(row.get::<_, i64>(0)?),
            bssid: row.get::<_, String>(1)?,
            ssid: row.get::<_, String>(2)?,
            level: row.get::<_, i32>(3)?,
            frequency: row.get::<_, u32>(4)?,
            batch_id: row.get::<_, String>(5)?,
            scan_time: parse_datetime(&row.get::<_, String>(6)?, "scan_time")?,
        });
    }

    Ok(readings)
}
