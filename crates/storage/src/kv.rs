use std::ops::Deref;


pub trait KvWrite {
    fn put(&self, key: &[u8], value: &[u8]) -> anyhow::Result<()>;
}


pub trait KvRead {
    fn get(&self, key: &[u8]) -> anyhow::Result<Option<impl Deref<Target = [u8]>>>;

    fn has(&self, key: &[u8]) -> anyhow::Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}
