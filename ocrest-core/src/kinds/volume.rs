use crate::{
    quantity::{parse_bytes, CapacityUnit},
    registry::props,
    Result,
};

wrapper! {
    /// A piece of storage provisioned in the cluster
    PersistentVolume
}

impl PersistentVolume {
    /// Capacity in bytes
    ///
    /// Quantities such as `5Gi` are normalized; fractional quantities are rejected.
    pub fn capacity(&self) -> Result<Option<u64>> {
        match self.core.get(props::CAPACITY)? {
            None => Ok(None),
            Some(serde_json::Value::Number(n)) => Ok(n.as_u64()),
            Some(other) => parse_bytes(other.as_str().unwrap_or_default()).map(Some),
        }
    }

    /// Set the capacity to `magnitude` units
    ///
    /// The value is stored normalized to bytes. Fails with
    /// [`Error::ArithmeticOverflow`](crate::Error::ArithmeticOverflow) rather than wrapping.
    pub fn set_capacity(&mut self, magnitude: u64, unit: CapacityUnit) -> Result<()> {
        let bytes = unit.to_bytes(magnitude)?;
        self.core.set(props::CAPACITY, bytes.to_string())
    }

    /// Supported access modes, e.g. `ReadWriteOnce`
    pub fn access_modes(&self) -> Result<Vec<String>> {
        self.core.strings(props::ACCESS_MODES)
    }

    /// What happens to the volume when its claim is released
    pub fn reclaim_policy(&self) -> Result<Option<String>> {
        self.core.string(props::RECLAIM_POLICY)
    }

    /// Lifecycle phase, e.g. `Bound`
    pub fn phase(&self) -> Result<Option<String>> {
        self.core.string(props::PHASE)
    }
}

#[cfg(test)]
mod tests {
    use super::PersistentVolume;
    use crate::{kinds::fixtures::core, quantity::CapacityUnit, resource::KindResource, Error};
    use serde_json::json;

    fn volume() -> PersistentVolume {
        PersistentVolume::from_core(core(json!({
            "kind": "PersistentVolume",
            "apiVersion": "v1",
            "spec": {
                "capacity": {"storage": "5Gi"},
                "accessModes": ["ReadWriteOnce", "ReadOnlyMany"],
                "persistentVolumeReclaimPolicy": "Retain"
            },
            "status": {"phase": "Available"}
        })))
    }

    #[test]
    fn reads_quantities() {
        let pv = volume();
        assert_eq!(pv.capacity().unwrap(), Some(5 << 30));
        assert_eq!(pv.access_modes().unwrap(), ["ReadWriteOnce", "ReadOnlyMany"]);
        assert_eq!(pv.reclaim_policy().unwrap().as_deref(), Some("Retain"));
        assert_eq!(pv.phase().unwrap().as_deref(), Some("Available"));
    }

    #[test]
    fn capacity_is_normalized() {
        let mut pv = volume();
        pv.set_capacity(512, CapacityUnit::Mi).unwrap();
        assert_eq!(pv.core.document().root()["spec"]["capacity"]["storage"], "536870912");
        assert_eq!(pv.capacity().unwrap(), Some(512 << 20));
    }

    #[test]
    fn overflow_leaves_the_document_alone() {
        let mut pv = volume();
        let err = pv.set_capacity(u64::MAX / 2, CapacityUnit::Ki).unwrap_err();
        assert!(matches!(err, Error::ArithmeticOverflow { unit, .. } if unit == "Ki"));
        assert_eq!(pv.capacity().unwrap(), Some(5 << 30));
    }
}
