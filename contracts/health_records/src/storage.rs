use soroban_sdk::{Env, IntoVal, Val, Vec};

// ~30 days at 5s ledgers
const PERSISTENT_TTL_THRESHOLD: u32 = 518_400;
// ~180 days
const PERSISTENT_TTL_EXTEND_TO: u32 = 3_110_400;

const INSTANCE_TTL_THRESHOLD: u32 = 518_400;
const INSTANCE_TTL_EXTEND_TO: u32 = 3_110_400;

/// Keeps a persistent entry live. Callers must only pass keys that exist.
pub fn extend_persistent<K>(env: &Env, key: &K)
where
    K: IntoVal<Env, Val>,
{
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND_TO);
}

/// Keeps the contract instance (admin, config, counters) live.
pub fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND_TO);
}

/// Ids per index page. An index is split across pages so no single
/// persistent entry grows past the ledger entry size limit.
pub const INDEX_PAGE_SIZE: u32 = 64;

/// Number of ids held by the paged index whose length lives at `len_key`.
pub fn index_len<L>(env: &Env, len_key: &L) -> u32
where
    L: IntoVal<Env, Val>,
{
    match env.storage().persistent().get::<_, u32>(len_key) {
        Some(len) => {
            extend_persistent(env, len_key);
            len
        }
        None => 0,
    }
}

/// Append `id` to a paged index. `page_key(n)` names page `n`.
pub fn index_push<L, P>(env: &Env, len_key: &L, page_key: impl Fn(u32) -> P, id: u64)
where
    L: IntoVal<Env, Val>,
    P: IntoVal<Env, Val>,
{
    let len = index_len(env, len_key);
    let key = page_key(len / INDEX_PAGE_SIZE);
    let mut page: Vec<u64> = env
        .storage()
        .persistent()
        .get(&key)
        .unwrap_or(Vec::new(env));
    page.push_back(id);
    env.storage().persistent().set(&key, &page);
    extend_persistent(env, &key);

    env.storage().persistent().set(len_key, &(len + 1));
    extend_persistent(env, len_key);
}

/// Every id in a paged index, in insertion order.
pub fn index_all<L, P>(env: &Env, len_key: &L, page_key: impl Fn(u32) -> P) -> Vec<u64>
where
    L: IntoVal<Env, Val>,
    P: IntoVal<Env, Val>,
{
    let mut ids = Vec::new(env);
    let len = index_len(env, len_key);
    if len == 0 {
        return ids;
    }

    for n in 0..=(len - 1) / INDEX_PAGE_SIZE {
        let key = page_key(n);
        if let Some(page) = env.storage().persistent().get::<_, Vec<u64>>(&key) {
            extend_persistent(env, &key);
            ids.append(&page);
        }
    }
    ids
}
