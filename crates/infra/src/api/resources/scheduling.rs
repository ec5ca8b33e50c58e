//! Scheduling: schedulers, appointment types, slots and appointments

use pokitdok_domain::{Envelope, Params, Result};
use serde::Serialize;

use super::{item_path, segment};
use crate::api::PokitDokClient;

const APPOINTMENTS: &str = "/schedule/appointments/";

fn appointment_path(appointment_uuid: &str) -> String {
    format!("{APPOINTMENTS}{}", segment(appointment_uuid))
}

impl PokitDokClient {
    /// Scheduling systems connected to the platform
    ///
    /// # Errors
    ///
    /// Auth and transport failures only
    pub async fn schedulers(&self, scheduler_uuid: Option<&str>) -> Result<Envelope> {
        self.get(&item_path("/schedule/schedulers/", scheduler_uuid), &Params::new()).await
    }

    /// # Errors
    ///
    /// Auth and transport failures only
    pub async fn appointment_types(&self, appointment_type_uuid: Option<&str>) -> Result<Envelope> {
        self.get(&item_path("/schedule/appointmenttypes/", appointment_type_uuid), &Params::new())
            .await
    }

    /// Create open slots on a provider's schedule
    ///
    /// # Errors
    ///
    /// Auth and transport failures only
    pub async fn schedule_slots<B>(&self, body: &B) -> Result<Envelope>
    where
        B: Serialize + ?Sized,
    {
        self.post("/schedule/slots/", body).await
    }

    /// Search appointments, or fetch one by uuid
    ///
    /// # Errors
    ///
    /// Auth and transport failures only
    pub async fn appointments(
        &self,
        appointment_uuid: Option<&str>,
        params: &Params,
    ) -> Result<Envelope> {
        self.get(&item_path(APPOINTMENTS, appointment_uuid), params).await
    }

    /// Book an open slot for a patient
    ///
    /// # Errors
    ///
    /// Auth and transport failures only
    pub async fn book_appointment<B>(&self, appointment_uuid: &str, body: &B) -> Result<Envelope>
    where
        B: Serialize + ?Sized,
    {
        self.put(&appointment_path(appointment_uuid), body).await
    }

    /// Change details of a booked appointment
    ///
    /// # Errors
    ///
    /// Auth and transport failures only
    pub async fn update_appointment<B>(&self, appointment_uuid: &str, body: &B) -> Result<Envelope>
    where
        B: Serialize + ?Sized,
    {
        self.put(&appointment_path(appointment_uuid), body).await
    }

    /// # Errors
    ///
    /// Auth and transport failures only
    pub async fn cancel_appointment(&self, appointment_uuid: &str) -> Result<Envelope> {
        self.delete(&appointment_path(appointment_uuid)).await
    }
}
